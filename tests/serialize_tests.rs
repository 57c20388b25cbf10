//! Scene Serialization Tests
//!
//! Tests for:
//! - Shared resources: geometry, material, multi-material, skeleton deduplication
//! - Opt-out: nodes, materials, geometries, nested under opted-out parents
//! - Selection closure: ancestors, descendants, idempotence
//! - Per-call cache scoping
//! - Section options: profiles, omission, disabled sections
//! - Environment texture variants
//! - Extension components
//! - Output: JSON rendering, writer failures

use glam::{Mat4, Vec3};
use myth_serialize::errors::Error;
use myth_serialize::resources::{DelayLoadState, Geometry, Material, Mesh, StandardMaterial, Texture};
use myth_serialize::scene::environment::{FogMode, PhysicsSettings};
use myth_serialize::scene::scene::Scene;
use myth_serialize::scene::skeleton::{Bone, Skeleton};
use myth_serialize::scene::{NodeHandle, SceneComponent};
use myth_serialize::serialize::keys;
use myth_serialize::{MaterialHandle, SectionOptions, SerializedDocument, Value};

fn triangle(name: &str) -> Geometry {
    let mut geometry = Geometry::new().with_name(name);
    geometry.positions = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    geometry.indices = vec![0, 1, 2];
    geometry
}

fn red(name: &str) -> StandardMaterial {
    StandardMaterial::new(name, Vec3::new(1.0, 0.0, 0.0))
}

fn ids(doc: &SerializedDocument, key: &str) -> Vec<String> {
    doc.records(key)
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

fn names(doc: &SerializedDocument, key: &str) -> Vec<String> {
    doc.records(key)
        .iter()
        .filter_map(|r| r.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// Three meshes sharing one geometry and one multi-material with two subs.
fn shared_scene() -> (Scene, Vec<NodeHandle>) {
    let mut scene = Scene::new();
    let geometry = scene.assets.add_geometry(triangle("tri"));
    let sub_a = scene.assets.add_material(red("a"));
    let sub_b = scene.assets.add_material(red("b"));
    let multi = scene.assets.add_material(Material::new_multi("multi", [sub_a, sub_b]));

    let handles = (0..3)
        .map(|i| scene.add_mesh(&format!("mesh{i}"), Mesh::new(geometry, multi)))
        .collect();
    (scene, handles)
}

// ============================================================================
// Shared Resource Deduplication
// ============================================================================

#[test]
fn shared_geometry_and_multi_material_emitted_once() {
    let (scene, handles) = shared_scene();
    let doc = scene.serializer().serialize_nodes(&handles, false, false);

    assert_eq!(doc.len_of(keys::MESHES), 3);
    assert_eq!(doc.vertex_data().len(), 1, "Shared geometry should be written once");
    assert_eq!(doc.len_of(keys::MULTI_MATERIALS), 1);
    assert_eq!(doc.len_of(keys::MATERIALS), 2);

    let geometry_id = doc.vertex_data()[0].get("id").and_then(Value::as_str).unwrap();
    for mesh in doc.records(keys::MESHES) {
        assert_eq!(mesh.get("geometryId").and_then(Value::as_str), Some(geometry_id));
    }
}

#[test]
fn full_scene_dedups_shared_resources() {
    let (scene, _) = shared_scene();
    let doc = scene.serializer().serialize_scene(&SectionOptions::default());

    assert_eq!(doc.len_of(keys::MESHES), 3);
    assert_eq!(doc.vertex_data().len(), 1);
    assert_eq!(doc.len_of(keys::MULTI_MATERIALS), 1);
    assert_eq!(doc.len_of(keys::MATERIALS), 2);
}

#[test]
fn multi_material_lists_sub_ids_in_order() {
    let (scene, handles) = shared_scene();
    let doc = scene.serializer().serialize_nodes(&handles[..1], false, false);

    let multi = &doc.records(keys::MULTI_MATERIALS)[0];
    let subs: Vec<_> = multi
        .get("materials")
        .and_then(Value::as_array)
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    assert_eq!(subs, ids(&doc, keys::MATERIALS));
}

#[test]
fn shared_skeleton_emitted_once() {
    let mut scene = Scene::new();
    let skeleton = scene.add_skeleton(Skeleton::new(
        "rig",
        vec![
            Bone::new("root", None, Mat4::IDENTITY),
            Bone::new("arm", Some(0), Mat4::from_translation(Vec3::X)),
        ],
    ));
    let geometry = scene.assets.add_geometry(triangle("body"));
    let material = scene.assets.add_material(red("skin"));

    let mut handles = Vec::new();
    for name in ["a", "b"] {
        let mut mesh = Mesh::new(geometry, material);
        mesh.skeleton = Some(skeleton);
        handles.push(scene.add_mesh(name, mesh));
    }

    let doc = scene.serializer().serialize_nodes(&handles, false, false);
    assert_eq!(doc.len_of(keys::SKELETONS), 1);

    let skeleton_id = ids(&doc, keys::SKELETONS).remove(0);
    for mesh in doc.records(keys::MESHES) {
        assert_eq!(mesh.get("skeletonId").and_then(Value::as_str), Some(skeleton_id.as_str()));
    }

    let bones = doc.records(keys::SKELETONS)[0].get("bones").and_then(Value::as_array).unwrap();
    assert_eq!(bones[0].get("parentBoneIndex").and_then(Value::as_f64), Some(-1.0));
    assert_eq!(bones[1].get("parentBoneIndex").and_then(Value::as_f64), Some(0.0));
}

// ============================================================================
// Opt-out
// ============================================================================

#[test]
fn opted_out_node_is_absent() {
    let mut scene = Scene::new();
    let kept = scene.add_transform_node("kept");
    let hidden = scene.add_transform_node("hidden");
    scene.get_node_mut(hidden).unwrap().do_not_serialize = true;

    let doc = scene.serializer().serialize_nodes(&[kept, hidden], false, false);
    assert_eq!(names(&doc, keys::TRANSFORM_NODES), vec!["kept"]);

    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    assert_eq!(names(&doc, keys::TRANSFORM_NODES), vec!["kept"]);
}

#[test]
fn opted_out_parent_keeps_descendants_on_both_paths() {
    let mut scene = Scene::new();
    let a = scene.add_transform_node("a");
    let p = scene.add_transform_node_to_parent("p", a);
    scene.add_transform_node_to_parent("g", p);
    scene.get_node_mut(p).unwrap().do_not_serialize = true;

    let selected = scene.serializer().serialize_nodes(&[a], false, true);
    let full = scene.serializer().serialize_scene(&SectionOptions::default());

    let mut from_selection = names(&selected, keys::TRANSFORM_NODES);
    let mut from_scene = names(&full, keys::TRANSFORM_NODES);
    from_selection.sort();
    from_scene.sort();
    assert_eq!(from_selection, vec!["a", "g"]);
    assert_eq!(from_selection, from_scene);
}

#[test]
fn dangling_child_handle_does_not_break_export() {
    let mut scene = Scene::new();
    let parent = scene.add_transform_node("parent");
    let child = scene.add_transform_node_to_parent("child", parent);
    let mesh = scene.spawn("mesh", triangle("tri"), red("mat"));
    scene.attach(mesh, parent);
    scene.nodes.remove(child);

    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    assert_eq!(names(&doc, keys::TRANSFORM_NODES), vec!["parent"]);
    assert_eq!(names(&doc, keys::MESHES), vec!["mesh"]);

    let doc = scene.serializer().serialize_nodes(&[parent], false, true);
    assert_eq!(names(&doc, keys::TRANSFORM_NODES), vec!["parent"]);
    assert_eq!(doc.len_of(keys::MESHES), 1);
}

#[test]
fn opted_out_material_falls_back_to_default() {
    let mut scene = Scene::new();
    let mut material = red("secret");
    material.do_not_serialize = true;
    let mesh = scene.spawn("m", triangle("tri"), material);

    let doc = scene.serializer().serialize_nodes(&[mesh], false, false);
    let default_id = scene.default_material.uuid().to_string();

    assert_eq!(names(&doc, keys::MATERIALS), vec!["default material"]);
    assert_eq!(
        doc.records(keys::MESHES)[0].get("materialId").and_then(Value::as_str),
        Some(default_id.as_str())
    );
}

#[test]
fn mesh_without_material_uses_default() {
    let mut scene = Scene::new();
    let geometry = scene.assets.add_geometry(triangle("tri"));
    let mut mesh = Mesh::empty();
    mesh.geometry = Some(geometry);
    let handle = scene.add_mesh("bare", mesh);

    let doc = scene.serializer().serialize_nodes(&[handle], false, false);
    let default_id = scene.default_material.uuid().to_string();
    assert_eq!(ids(&doc, keys::MATERIALS), vec![default_id]);
}

#[test]
fn opted_out_geometry_is_not_written_or_referenced() {
    let mut scene = Scene::new();
    let mut geometry = triangle("tri");
    geometry.do_not_serialize = true;
    let mesh = scene.spawn("m", geometry, red("mat"));

    let doc = scene.serializer().serialize_nodes(&[mesh], false, false);
    assert!(doc.vertex_data().is_empty());
    assert!(doc.records(keys::MESHES)[0].get("geometryId").is_none());
}

#[test]
fn streaming_mesh_is_skipped() {
    let mut scene = Scene::new();
    let mesh = scene.spawn("m", triangle("tri"), red("mat"));
    scene.mesh_of_mut(mesh).unwrap().delay_load_state = DelayLoadState::Loading;

    let doc = scene.serializer().serialize_nodes(&[mesh], false, false);
    assert_eq!(doc.len_of(keys::MESHES), 0);
    assert_eq!(doc.len_of(keys::MATERIALS), 0);
}

#[test]
fn stale_handle_is_skipped() {
    let mut scene = Scene::new();
    let kept = scene.add_transform_node("kept");
    let removed = scene.add_transform_node("removed");
    scene.remove_node(removed);

    let doc = scene.serializer().serialize_nodes(&[removed, kept], false, false);
    assert_eq!(names(&doc, keys::TRANSFORM_NODES), vec!["kept"]);
}

// ============================================================================
// Selection Closure
// ============================================================================

#[test]
fn with_parents_reaches_grandparent() {
    let mut scene = Scene::new();
    let grandparent = scene.add_transform_node("grandparent");
    let parent = scene.add_transform_node_to_parent("parent", grandparent);
    let child = scene.add_transform_node_to_parent("child", parent);

    let doc = scene.serializer().serialize_nodes(&[child], true, false);
    let mut got = names(&doc, keys::TRANSFORM_NODES);
    got.sort();
    assert_eq!(got, vec!["child", "grandparent", "parent"]);

    let child_record = doc.find_by_name(keys::TRANSFORM_NODES, "child").unwrap();
    let parent_record = doc.find_by_name(keys::TRANSFORM_NODES, "parent").unwrap();
    assert_eq!(
        child_record.get("parentId").and_then(Value::as_str),
        parent_record.get("id").and_then(Value::as_str)
    );
}

#[test]
fn with_children_collects_subtree_across_kinds() {
    let mut scene = Scene::new();
    let root = scene.add_transform_node("root");
    scene.add_light_to_parent("lamp", myth_serialize::Light::new_point(Vec3::ONE, 1.0, 5.0), root);
    let arm = scene.add_transform_node_to_parent("arm", root);
    let geometry = scene.assets.add_geometry(triangle("tri"));
    let material = scene.assets.add_material(red("mat"));
    scene.add_mesh_to_parent("hand", Mesh::new(geometry, material), arm);
    scene.add_transform_node("unrelated");

    let doc = scene.serializer().serialize_nodes(&[root], false, true);
    assert_eq!(doc.len_of(keys::TRANSFORM_NODES), 2);
    assert_eq!(names(&doc, keys::LIGHTS), vec!["lamp"]);
    assert_eq!(names(&doc, keys::MESHES), vec!["hand"]);
    assert!(doc.find_by_name(keys::TRANSFORM_NODES, "unrelated").is_none());
}

#[test]
fn without_expansion_only_selection_is_written() {
    let mut scene = Scene::new();
    let parent = scene.add_transform_node("parent");
    let child = scene.add_transform_node_to_parent("child", parent);

    let doc = scene.serializer().serialize_nodes(&[child], false, false);
    assert_eq!(names(&doc, keys::TRANSFORM_NODES), vec!["child"]);
    assert_eq!(doc.len_of(keys::MESHES), 0);
    assert!(doc.section(keys::CAMERAS).is_some(), "Selection sections are always present");
}

#[test]
fn closure_is_idempotent() {
    let mut scene = Scene::new();
    let a = scene.add_transform_node("a");
    let b = scene.add_transform_node_to_parent("b", a);
    let c = scene.add_transform_node_to_parent("c", b);
    scene.add_transform_node_to_parent("d", c);

    let first = scene.serializer().serialize_nodes(&[b], true, true);
    let mut first_names = names(&first, keys::TRANSFORM_NODES);
    first_names.sort();

    let handles: Vec<NodeHandle> = scene
        .nodes
        .iter()
        .filter(|(_, n)| first_names.contains(&n.name))
        .map(|(h, _)| h)
        .collect();
    let second = scene.serializer().serialize_nodes(&handles, true, true);
    let mut second_names = names(&second, keys::TRANSFORM_NODES);
    second_names.sort();

    assert_eq!(first_names, second_names);
    assert_eq!(first_names, vec!["a", "b", "c", "d"]);
}

// ============================================================================
// Cache Scoping
// ============================================================================

#[test]
fn each_call_gets_complete_geometries() {
    let (scene, handles) = shared_scene();
    let serializer = scene.serializer();

    let first = serializer.serialize_scene(&SectionOptions::default());
    let second = serializer.serialize_scene(&SectionOptions::default());
    assert_eq!(first.vertex_data().len(), 1);
    assert_eq!(second.vertex_data().len(), 1);

    let selection = serializer.serialize_nodes(&handles, false, false);
    assert_eq!(selection.vertex_data().len(), 1);
}

#[test]
fn full_scene_skips_unready_geometry_section_only() {
    let mut scene = Scene::new();
    scene.assets.add_geometry(triangle("loading").pending());
    let ready = scene.assets.add_geometry(triangle("ready"));
    let material = scene.assets.add_material(red("mat"));
    scene.add_mesh("m", Mesh::new(ready, material));

    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    assert_eq!(doc.vertex_data().len(), 1);
}

// ============================================================================
// Section Options
// ============================================================================

#[test]
fn profile_parses_camel_case_keys() {
    let options = SectionOptions::from_json_str(r#"{ "geometries": false, "transformNodes": false }"#)
        .unwrap();
    assert!(!options.geometries);
    assert!(!options.transform_nodes);
    assert!(options.meshes);
}

#[test]
fn profile_rejects_unknown_keys() {
    let err = SectionOptions::from_json_str(r#"{ "particles": true }"#).unwrap_err();
    assert!(matches!(err, Error::InvalidOptions(_)));
}

#[test]
fn unset_fog_and_physics_are_absent() {
    let (scene, _) = shared_scene();
    let doc = scene.serializer().serialize_scene(&SectionOptions::default());

    assert!(doc.section(keys::FOG_MODE).is_none());
    assert!(doc.section(keys::PHYSICS_ENABLED).is_none());
    assert!(doc.section(keys::ENVIRONMENT_TEXTURE).is_none());
    assert!(doc.section(keys::AUTO_CLEAR).is_some(), "Scalars are always written");
}

#[test]
fn fog_and_physics_written_when_set() {
    let mut scene = Scene::new();
    scene.fog.mode = FogMode::Exp2;
    scene.physics = Some(PhysicsSettings::new("rapier", Vec3::new(0.0, -9.81, 0.0)));

    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    assert_eq!(doc.section(keys::FOG_MODE).and_then(Value::as_f64), Some(2.0));
    assert_eq!(doc.section(keys::PHYSICS_ENABLED).and_then(Value::as_bool), Some(true));
    assert_eq!(doc.section(keys::PHYSICS_ENGINE).and_then(Value::as_str), Some("rapier"));

    let doc = scene
        .serializer()
        .serialize_scene(&SectionOptions::all().with_fog(false).with_physics(false));
    assert!(doc.section(keys::FOG_MODE).is_none());
    assert!(doc.section(keys::PHYSICS_ENABLED).is_none());
}

#[test]
fn disabled_sections_are_omitted() {
    let (scene, _) = shared_scene();
    let doc = scene.serializer().serialize_scene(&SectionOptions::none());

    for key in [
        keys::MESHES,
        keys::MATERIALS,
        keys::MULTI_MATERIALS,
        keys::GEOMETRIES,
        keys::LIGHTS,
        keys::CAMERAS,
        keys::TRANSFORM_NODES,
        keys::SKELETONS,
    ] {
        assert!(doc.section(key).is_none(), "Section '{key}' should be absent");
    }
}

#[test]
fn meshes_without_material_section_still_reference_ids() {
    let (scene, _) = shared_scene();
    let options = SectionOptions::all().with_materials(false).with_geometries(false);
    let doc = scene.serializer().serialize_scene(&options);

    assert_eq!(doc.len_of(keys::MESHES), 3);
    assert!(doc.section(keys::MATERIALS).is_none());
    assert!(doc.vertex_data().is_empty());
    assert!(doc.records(keys::MESHES)[0].get("materialId").is_some());
    assert!(doc.records(keys::MESHES)[0].get("geometryId").is_some());
}

#[test]
fn active_camera_id_is_written() {
    let mut scene = Scene::new();
    let camera = scene.add_camera(
        "main",
        myth_serialize::Camera::new_perspective(45.0, 1.0, 0.1, 100.0),
    );
    scene.set_active_camera(camera);

    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    let camera_id = scene.get_node(camera).unwrap().uuid.to_string();
    assert_eq!(
        doc.section(keys::ACTIVE_CAMERA_ID).and_then(Value::as_str),
        Some(camera_id.as_str())
    );
    assert_eq!(names(&doc, keys::CAMERAS), vec!["main"]);
}

// ============================================================================
// Environment Texture
// ============================================================================

#[test]
fn cube_environment_writes_full_record() {
    let mut scene = Scene::new();
    let files = (0..6).map(|i| format!("sky_{i}.png")).collect();
    let texture = scene.assets.add_texture(Texture::from_cube_files("sky", files));
    scene.environment.set_texture(Some(texture));
    scene.environment.set_intensity(0.5);

    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    let record = doc.section(keys::ENVIRONMENT_TEXTURE).unwrap();
    assert_eq!(record.get("isCube").and_then(Value::as_bool), Some(true));
    assert_eq!(record.get("files").and_then(Value::as_array).map(<[Value]>::len), Some(6));
    assert_eq!(doc.section(keys::ENVIRONMENT_INTENSITY).and_then(Value::as_f64), Some(0.5));
}

#[test]
fn other_environment_writes_name_and_rotation() {
    let mut scene = Scene::new();
    let mut texture = Texture::from_url("env.hdr");
    texture.rotation_y = 1.5;
    let texture = scene.assets.add_texture(texture);
    scene.environment.set_texture(Some(texture));

    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    assert_eq!(doc.section(keys::ENVIRONMENT_TEXTURE).and_then(Value::as_str), Some("env.hdr"));
    assert_eq!(
        doc.section(keys::ENVIRONMENT_TEXTURE_ROTATION_Y).and_then(Value::as_f64),
        Some(1.5)
    );
}

#[test]
fn opted_out_environment_texture_is_absent() {
    let mut scene = Scene::new();
    let mut texture = Texture::from_url("env.hdr");
    texture.do_not_serialize = true;
    let texture = scene.assets.add_texture(texture);
    scene.environment.set_texture(Some(texture));

    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    assert!(doc.section(keys::ENVIRONMENT_TEXTURE).is_none());
    assert!(doc.section(keys::ENVIRONMENT_INTENSITY).is_none());
}

// ============================================================================
// Extension Components
// ============================================================================

struct Markers {
    labels: Vec<&'static str>,
}

impl SceneComponent for Markers {
    fn name(&self) -> &str {
        "markers"
    }

    fn serialize(&self, _scene: &Scene, document: &mut SerializedDocument) -> myth_serialize::Result<()> {
        for label in &self.labels {
            document.push("markers", Value::object().with("label", *label));
        }
        Ok(())
    }
}

struct Broken;

impl SceneComponent for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn serialize(&self, _scene: &Scene, document: &mut SerializedDocument) -> myth_serialize::Result<()> {
        document.set("broken", true);
        Err(Error::InvalidOptions("component state unavailable".to_string()))
    }
}

#[test]
fn components_append_their_sections() {
    let mut scene = Scene::new();
    scene.register_component(Markers {
        labels: vec!["spawn", "exit"],
    });

    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    assert_eq!(doc.len_of("markers"), 2);

    let doc = scene
        .serializer()
        .serialize_scene(&SectionOptions::all().with_components(false));
    assert!(doc.section("markers").is_none());
}

#[test]
fn failing_component_does_not_abort_export() {
    let mut scene = Scene::new();
    scene.register_component(Broken);
    scene.register_component(Markers { labels: vec!["a"] });
    scene.add_transform_node("n");

    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    assert_eq!(doc.len_of(keys::TRANSFORM_NODES), 1);
    assert_eq!(doc.len_of("markers"), 1);
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn resolved_document_renders_json() -> anyhow::Result<()> {
    let (scene, _) = shared_scene();
    let doc = scene.serializer().serialize_scene(&SectionOptions::default());
    assert!(doc.is_resolved());

    let text = doc.to_json_string()?;
    let parsed: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(parsed["meshes"].as_array().map(Vec::len), Some(3));
    assert_eq!(parsed["geometries"]["vertexData"].as_array().map(Vec::len), Some(1));

    let mut buffer = Vec::new();
    doc.write_json(&mut buffer)?;
    assert_eq!(serde_json::from_slice::<serde_json::Value>(&buffer)?, parsed);
    Ok(())
}

struct FullDisk;

impl std::io::Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk full"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn failing_writer_reports_io_error() {
    let mut scene = Scene::new();
    scene.add_transform_node("n");
    let doc = scene.serializer().serialize_scene(&SectionOptions::default());

    match doc.write_json(FullDisk) {
        Err(Error::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::Other),
        other => panic!("Expected IO error, got {other:?}"),
    }
}

#[test]
fn material_handle_reused_across_kinds() {
    let mut scene = Scene::new();
    let material: MaterialHandle = scene.assets.add_material(red("shared"));
    let geometry = scene.assets.add_geometry(triangle("tri"));
    let a = scene.add_mesh("a", Mesh::new(geometry, material));
    let b = scene.add_mesh("b", Mesh::new(geometry, material));

    let doc = scene.serializer().serialize_nodes(&[a, b], false, false);
    assert_eq!(names(&doc, keys::MATERIALS), vec!["shared"]);
}
