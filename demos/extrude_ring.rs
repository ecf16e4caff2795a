//! Builds a square ring, extrudes it and prints a summary.
//!
//! ```text
//! cargo run --example extrude_ring
//! RUST_LOG=slabmesh=debug cargo run --example extrude_ring
//! ```

use slabmesh::math::{Point3, Vector3};
use slabmesh::operations::creation::{ImportedFace, ImportedMesh};
use slabmesh::operations::query::{FindNonUnitNormals, RayCast};
use slabmesh::operations::shaping::{Extrude, ExtrudeParams, SideNormals};
use slabmesh::topology::Solid;

fn ring_mesh() -> ImportedMesh {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 3.0),
        Point3::new(0.0, 0.0, 3.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(2.0, 0.0, 1.0),
        Point3::new(2.0, 0.0, 2.0),
        Point3::new(1.0, 0.0, 2.0),
    ];
    let normals = vec![Vector3::y(); vertices.len()];
    let faces = (0..4)
        .flat_map(|k| {
            let (o0, o1) = (k, (k + 1) % 4);
            let (i0, i1) = (k + 4, (k + 1) % 4 + 4);
            [
                ImportedFace::triangle([o0, i0, o1]),
                ImportedFace::triangle([o1, i0, i1]),
            ]
        })
        .collect();
    ImportedMesh::new(vertices, normals, faces)
}

fn main() -> slabmesh::Result<()> {
    // Default: WARN for everything, INFO for slabmesh.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("slabmesh=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut solid = Solid::from_mesh(ring_mesh())?;
    for (r, region) in solid.base().regions().iter().enumerate() {
        println!(
            "region {r}: {} polygons, outer {:?}, {} hole(s)",
            region.polygons().len(),
            region.outer().vertices(),
            region.inner().len()
        );
    }

    Extrude::new(ExtrudeParams::new(0.5).with_side_normals(SideNormals::Smooth))
        .execute(&mut solid)?;
    println!(
        "extruded: {} polygons ({} sides), center {:?}",
        solid.polygon_count(),
        solid.sides().len(),
        solid.center()
    );

    let bad = FindNonUnitNormals::default().execute(&solid);
    println!("non-unit normals: {}", bad.len());

    let hit = RayCast::new(Point3::new(0.5, 5.0, 0.5), -Vector3::y()).execute(&solid)?;
    println!("downward ray: {hit:?}");
    Ok(())
}
