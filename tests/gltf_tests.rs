//! glTF Loader Tests
//!
//! Tests for:
//! - Node hierarchy under the wrapper root
//! - Mesh primitives attached to their nodes
//! - Translation animation channels becoming named clips
//! - Channels without a target node
//! - Missing files and broken buffers

use std::path::{Path, PathBuf};

use glam::Vec3;

use journey::animation::binding::TargetPath;
use journey::animation::clip::TrackData;
use journey::assets::GltfLoader;
use journey::errors::JourneyError;
use journey::scene::Scene;

/// Triangle positions (36 bytes), keyframe times (8 bytes), translations (24 bytes).
fn buffer_bytes() -> Vec<u8> {
    let floats: [f32; 17] = [
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, // positions
        0.0, 1.0, // times
        0.0, 1.0, 0.0, 0.0, 2.0, 0.0, // translations
    ];
    floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}

const DOCUMENT: &str = r#"{
    "asset": { "version": "2.0" },
    "scene": 0,
    "scenes": [ { "nodes": [0] } ],
    "nodes": [
        { "name": "Avatar", "children": [1] },
        { "name": "Bone", "translation": [0.0, 1.0, 0.0], "mesh": 0 }
    ],
    "meshes": [
        { "name": "Body", "primitives": [ { "attributes": { "POSITION": 0 } } ] }
    ],
    "animations": [
        {
            "name": "wave",
            "channels": [ { "sampler": 0, "target": { "node": 1, "path": "translation" } } ],
            "samplers": [ { "input": 1, "output": 2, "interpolation": "LINEAR" } ]
        }
    ],
    "buffers": [ { "uri": "model.bin", "byteLength": 68 } ],
    "bufferViews": [
        { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
        { "buffer": 0, "byteOffset": 36, "byteLength": 8 },
        { "buffer": 0, "byteOffset": 44, "byteLength": 24 }
    ],
    "accessors": [
        { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
          "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
        { "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
          "min": [0.0], "max": [1.0] },
        { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
    ]
}"#;

fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("journey-gltf-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_fixture(dir: &Path, with_buffer: bool) -> PathBuf {
    let path = dir.join("model.gltf");
    std::fs::write(&path, DOCUMENT).unwrap();
    if with_buffer {
        std::fs::write(dir.join("model.bin"), buffer_bytes()).unwrap();
    }
    path
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn loads_hierarchy_mesh_and_clip() {
    let dir = fixture_dir("full");
    let path = write_fixture(&dir, true);

    let mut scene = Scene::new();
    let model = GltfLoader::load(&path, &mut scene).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    let root = scene.get_node(model.root).unwrap();
    assert_eq!(root.name, "gltf_root");
    assert_eq!(root.children().len(), 1);

    let avatar = scene.find_node_by_name(model.root, "Avatar").unwrap();
    let bone = scene.find_node_by_name(model.root, "Bone").unwrap();
    assert_eq!(scene.get_node(bone).unwrap().parent(), Some(avatar));
    assert_eq!(scene.get_node(avatar).unwrap().parent(), Some(model.root));
    assert_eq!(scene.root_nodes, vec![model.root]);

    // The single primitive sits on the node itself.
    let mesh = &scene.meshes[bone];
    assert_eq!(mesh.name, "Body");
    assert_eq!(mesh.geometry.vertex_count(), 3);
    assert_eq!(mesh.geometry.indices, vec![0, 1, 2]);
    assert!(!mesh.geometry.is_skinned());

    scene.update();
    let p = scene.world_position(bone).unwrap();
    assert!((p - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
}

#[test]
fn animation_becomes_named_clip() {
    let dir = fixture_dir("clip");
    let path = write_fixture(&dir, true);

    let mut scene = Scene::new();
    let model = GltfLoader::load(&path, &mut scene).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(model.clips.len(), 1);
    let clip = &model.clips[0];
    assert_eq!(clip.name, "wave");
    assert!((clip.duration - 1.0).abs() < f32::EPSILON);

    assert_eq!(clip.tracks.len(), 1);
    let track = &clip.tracks[0];
    assert_eq!(track.meta.node_name, "Bone");
    assert_eq!(track.meta.target, TargetPath::Translation);
    assert!(matches!(track.data, TrackData::Vector3(_)));
}

#[test]
fn load_from_slice_resolves_buffers_against_base_path() {
    let dir = fixture_dir("slice");
    write_fixture(&dir, true);

    let mut scene = Scene::new();
    let model = GltfLoader::load_from_slice(DOCUMENT.as_bytes(), &dir, &mut scene).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert!(scene.find_node_by_name(model.root, "Bone").is_some());
}

#[test]
fn channel_without_target_node_is_skipped() {
    let dir = fixture_dir("notarget");
    write_fixture(&dir, true);
    let document = DOCUMENT.replace(
        r#"{ "sampler": 0, "target": { "node": 1, "path": "translation" } }"#,
        r#"{ "sampler": 0, "target": { "path": "translation" } },
               { "sampler": 0, "target": { "node": 1, "path": "translation" } }"#,
    );
    assert_ne!(document, DOCUMENT);

    let mut scene = Scene::new();
    let model = GltfLoader::load_from_slice(document.as_bytes(), &dir, &mut scene).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(model.clips.len(), 1);
    let clip = &model.clips[0];
    assert_eq!(clip.tracks.len(), 1);
    assert_eq!(clip.tracks[0].meta.node_name, "Bone");
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn missing_file_is_asset_not_found() {
    let mut scene = Scene::new();
    let err = GltfLoader::load(Path::new("does/not/exist.glb"), &mut scene).unwrap_err();
    assert!(matches!(err, JourneyError::AssetNotFound(_)));
}

#[test]
fn missing_buffer_is_gltf_error() {
    let dir = fixture_dir("nobuf");
    let path = write_fixture(&dir, false);

    let mut scene = Scene::new();
    let err = GltfLoader::load(&path, &mut scene).unwrap_err();
    std::fs::remove_dir_all(&dir).ok();
    assert!(matches!(err, JourneyError::GltfError(_)), "got {err}");
}

#[test]
fn garbage_bytes_are_rejected() {
    let mut scene = Scene::new();
    let result = GltfLoader::load_from_slice(b"definitely not gltf", Path::new("."), &mut scene);
    assert!(matches!(result, Err(JourneyError::GltfError(_))));
}
