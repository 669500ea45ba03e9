//! Built-in test scenes.

use chroma_core::{CameraDescriptor, GeometryRecord, MaterialRecord, SceneDescription};
use chroma_math::Vec3;

/// Two triangles covering the quad `a b c d` (in winding order).
fn quad(a: Vec3, b: Vec3, c: Vec3, d: Vec3, material: usize) -> [GeometryRecord; 2] {
    [
        GeometryRecord::Triangle {
            p0: a,
            p1: b,
            p2: c,
            material,
        },
        GeometryRecord::Triangle {
            p0: a,
            p1: c,
            p2: d,
            material,
        },
    ]
}

/// Cornell box open toward +Z: left (red), right (green), back, floor and
/// ceiling walls, plus a square area light just below the ceiling.
///
/// The camera sits in front of the opening and sees the whole box.
pub fn cornell_box(center: Vec3, half_dimension: f32) -> SceneDescription {
    let h = half_dimension;
    let camera = CameraDescriptor::new(
        center + Vec3::new(0.0, 0.0, 2.7 * h),
        Vec3::Y,
        Vec3::NEG_Z,
        0.03,
    );
    let mut scene = SceneDescription::new("cornell-box", camera);

    let white = scene.add_material(MaterialRecord::diffuse("white", Vec3::new(0.8, 0.78, 0.75)));
    let red = scene.add_material(MaterialRecord::diffuse("red", Vec3::new(0.75, 0.15, 0.12)));
    let green = scene.add_material(MaterialRecord::diffuse("green", Vec3::new(0.15, 0.6, 0.15)));
    let lamp = scene.add_material(MaterialRecord::emitting("lamp", Vec3::new(1.0, 0.95, 0.85), 25.0));

    let corner = |x: f32, y: f32, z: f32| center + Vec3::new(x, y, z) * h;

    // left
    scene.extend_geometry(quad(
        corner(-1.0, -1.0, 1.0),
        corner(-1.0, -1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        corner(-1.0, 1.0, 1.0),
        red,
    ));
    // back
    scene.extend_geometry(quad(
        corner(-1.0, -1.0, -1.0),
        corner(1.0, -1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        white,
    ));
    // floor
    scene.extend_geometry(quad(
        corner(-1.0, -1.0, 1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, -1.0, -1.0),
        corner(-1.0, -1.0, -1.0),
        white,
    ));
    // right
    scene.extend_geometry(quad(
        corner(1.0, -1.0, -1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(1.0, 1.0, -1.0),
        green,
    ));
    // top
    scene.extend_geometry(quad(
        corner(-1.0, 1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
        white,
    ));

    scene.add_geometry(GeometryRecord::AreaLight {
        corner: corner(-0.25, 0.99, -0.25),
        edge_u: Vec3::X * (0.5 * h),
        edge_v: Vec3::Z * (0.5 * h),
        material: lamp,
    });

    scene
}

/// The default scene: a Cornell box of half size 2 around the origin with
/// a diffuse and a mirror sphere on the floor.
pub fn cornell_box_scene() -> SceneDescription {
    let h = 2.0;
    let mut scene = cornell_box(Vec3::ZERO, h);

    let grey = scene.add_material(MaterialRecord::diffuse("grey", Vec3::splat(0.7)));
    let mirror = scene.add_material(MaterialRecord::specular("mirror", Vec3::splat(0.95), 0.0));

    let radius = 0.35 * h;
    scene.add_geometry(GeometryRecord::Sphere {
        center: Vec3::new(-0.45 * h, -h + radius, -0.25 * h),
        radius,
        material: grey,
    });
    scene.add_geometry(GeometryRecord::Sphere {
        center: Vec3::new(0.45 * h, -h + radius, 0.2 * h),
        radius,
        material: mirror,
    });

    scene
}

/// White furnace: a diffuse sphere of albedo 0.5 inside a closed cube
/// that emits unit radiance from every wall.
///
/// Every path off the sphere ends on a wall, so the sphere converges to
/// exactly `albedo * 1.0` and the walls to 1.0. The camera sits inside the
/// cube with a 90 degree field of view.
pub fn furnace_test_scene() -> SceneDescription {
    let h = 2.0;
    let camera = CameraDescriptor::new(Vec3::new(0.0, 0.0, 0.95 * h), Vec3::Y, Vec3::NEG_Z, 0.018);
    let mut scene = SceneDescription::new("furnace", camera);

    let glow = scene.add_material(MaterialRecord::emitting("glow", Vec3::ONE, 1.0));
    let grey = scene.add_material(MaterialRecord::diffuse("grey", Vec3::splat(0.5)));

    let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z) * h;
    let faces = [
        // -x, +x
        [(-1.0, -1.0, 1.0), (-1.0, -1.0, -1.0), (-1.0, 1.0, -1.0), (-1.0, 1.0, 1.0)],
        [(1.0, -1.0, -1.0), (1.0, -1.0, 1.0), (1.0, 1.0, 1.0), (1.0, 1.0, -1.0)],
        // -y, +y
        [(-1.0, -1.0, 1.0), (1.0, -1.0, 1.0), (1.0, -1.0, -1.0), (-1.0, -1.0, -1.0)],
        [(-1.0, 1.0, -1.0), (1.0, 1.0, -1.0), (1.0, 1.0, 1.0), (-1.0, 1.0, 1.0)],
        // -z, +z
        [(-1.0, -1.0, -1.0), (1.0, -1.0, -1.0), (1.0, 1.0, -1.0), (-1.0, 1.0, -1.0)],
        [(1.0, -1.0, 1.0), (-1.0, -1.0, 1.0), (-1.0, 1.0, 1.0), (1.0, 1.0, 1.0)],
    ];
    for [a, b, c, d] in faces {
        scene.extend_geometry(quad(
            corner(a.0, a.1, a.2),
            corner(b.0, b.1, b.2),
            corner(c.0, c.1, c.2),
            corner(d.0, d.1, d.2),
            glow,
        ));
    }

    scene.add_geometry(GeometryRecord::Sphere {
        center: Vec3::ZERO,
        radius: 0.5 * h,
        material: grey,
    });

    scene
}
