use std::fs;
use std::path::Path;
use std::sync::Arc;

use glam::{Affine3A, Mat4, Quat, Vec3, Vec4};
use gltf::animation::util::ReadOutputs;

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::errors::{JourneyError, Result};
use crate::resources::{Geometry, Image, Material, Mesh, SkinAttributes};
use crate::scene::{Node, NodeHandle, Scene, Skeleton, SkeletonKey};

/// A glTF model instantiated into a [`Scene`].
#[derive(Debug)]
pub struct LoadedModel {
    /// Wrapper node holding the file's scene roots.
    pub root: NodeHandle,
    /// Every animation in the file, named after the glTF animation.
    pub clips: Vec<AnimationClip>,
}

/// Loads `.glb` / `.gltf` files into a [`Scene`].
///
/// Supports node hierarchies, skins, multi-primitive meshes with a base
/// colour factor and texture, and translation/rotation/scale animation.
/// Morph targets and other material channels are ignored.
pub struct GltfLoader<'a> {
    scene: &'a mut Scene,
    document: &'a gltf::Gltf,
    buffers: Vec<Vec<u8>>,
    base_path: &'a Path,
    node_mapping: Vec<NodeHandle>,
    images: Vec<Option<Arc<Image>>>,
}

impl<'a> GltfLoader<'a> {
    /// Reads and instantiates the model at `path`.
    pub fn load(path: &Path, scene: &mut Scene) -> Result<LoadedModel> {
        if !path.exists() {
            return Err(JourneyError::AssetNotFound(path.display().to_string()));
        }
        let bytes = fs::read(path)?;
        let base_path = path.parent().unwrap_or(Path::new("./"));
        let model = Self::load_from_slice(&bytes, base_path, scene)?;
        log::info!(
            "Loaded model '{}' with {} animation(s)",
            path.display(),
            model.clips.len()
        );
        Ok(model)
    }

    /// Instantiates a model from in-memory glTF or GLB bytes. External
    /// buffers and images are resolved against `base_path`.
    pub fn load_from_slice(bytes: &[u8], base_path: &Path, scene: &mut Scene) -> Result<LoadedModel> {
        let document = gltf::Gltf::from_reader_without_validation(std::io::Cursor::new(bytes))?;

        let unsupported: Vec<_> = document.extensions_required().collect();
        if !unsupported.is_empty() {
            log::warn!("glTF requires extensions that are not handled: {unsupported:?}");
        }

        let buffers = load_buffers(&document, base_path)?;
        let image_count = document.images().count();

        let mut loader = GltfLoader {
            scene,
            document: &document,
            buffers,
            base_path,
            node_mapping: Vec::with_capacity(document.nodes().count()),
            images: vec![None; image_count],
        };

        for node in document.nodes() {
            let handle = loader.create_node(&node);
            loader.node_mapping.push(handle);
        }

        let root = loader.scene.create_node_with_name("gltf_root");
        for node in document.nodes() {
            let parent = loader.node_mapping[node.index()];
            for child in node.children() {
                loader.scene.attach(loader.node_mapping[child.index()], parent);
            }
        }
        if let Some(default_scene) = document.default_scene().or_else(|| document.scenes().next()) {
            for node in default_scene.nodes() {
                loader.scene.attach(loader.node_mapping[node.index()], root);
            }
        }

        let skeletons = loader.load_skins();
        for node in document.nodes() {
            loader.bind_node_mesh_and_skin(&node, &skeletons)?;
        }

        let clips = loader.load_animations()?;
        Ok(LoadedModel { root, clips })
    }

    fn create_node(&mut self, node: &gltf::Node) -> NodeHandle {
        let name = node
            .name()
            .map_or_else(|| format!("Node_{}", node.index()), str::to_string);
        let mut engine_node = Node::new(name);
        let (t, r, s) = node.transform().decomposed();
        engine_node.transform.position = Vec3::from_array(t);
        engine_node.transform.rotation = Quat::from_array(r);
        engine_node.transform.scale = Vec3::from_array(s);
        self.scene.add_node(engine_node)
    }

    fn load_skins(&mut self) -> Vec<SkeletonKey> {
        let mut keys = Vec::new();
        for skin in self.document.skins() {
            let reader = skin.reader(|buffer| self.buffers.get(buffer.index()).map(Vec::as_slice));
            let joint_count = skin.joints().count();
            let ibms: Vec<Affine3A> = match reader.read_inverse_bind_matrices() {
                Some(iter) => iter
                    .map(|m| Affine3A::from_mat4(Mat4::from_cols_array_2d(&m)))
                    .collect(),
                None => vec![Affine3A::IDENTITY; joint_count],
            };
            let bones = skin
                .joints()
                .map(|joint| self.node_mapping[joint.index()])
                .collect();

            let skeleton = Skeleton::new(skin.name().unwrap_or("Skeleton"), bones, ibms);
            keys.push(self.scene.add_skeleton(skeleton));
        }
        keys
    }

    fn bind_node_mesh_and_skin(&mut self, node: &gltf::Node, skeletons: &[SkeletonKey]) -> Result<()> {
        let Some(mesh) = node.mesh() else {
            return Ok(());
        };
        let handle = self.node_mapping[node.index()];
        let skeleton = node.skin().and_then(|s| skeletons.get(s.index()).copied());
        let mesh_name = mesh.name().unwrap_or("Mesh").to_string();

        let primitives: Vec<_> = mesh.primitives().collect();
        let single = primitives.len() == 1;
        for (i, primitive) in primitives.iter().enumerate() {
            let Some(engine_mesh) = self.build_mesh(&mesh_name, primitive)? else {
                continue;
            };
            // Extra primitives hang off child nodes so each node carries one mesh.
            let target = if single {
                self.scene.set_mesh(handle, engine_mesh);
                handle
            } else {
                let sub = self.scene.add_to_parent(Node::new(format!("{mesh_name}_{i}")), handle);
                self.scene.set_mesh(sub, engine_mesh);
                sub
            };
            if let Some(key) = skeleton {
                self.scene.bind_skeleton(target, key);
            }
        }
        Ok(())
    }

    fn build_mesh(&mut self, name: &str, primitive: &gltf::Primitive) -> Result<Option<Mesh>> {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!("Mesh '{name}': skipping non-triangle primitive");
            return Ok(None);
        }

        let buffers = &self.buffers;
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

        let positions: Vec<[f32; 3]> = reader.read_positions().map(Iterator::collect).unwrap_or_default();
        if positions.is_empty() {
            return Ok(None);
        }
        let normals: Vec<[f32; 3]> = reader.read_normals().map(Iterator::collect).unwrap_or_default();
        let uvs: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|r| r.into_f32().collect())
            .unwrap_or_default();
        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let mut geometry = Geometry::new(positions, normals, uvs, indices);
        if let (Some(joints), Some(weights)) = (reader.read_joints(0), reader.read_weights(0)) {
            geometry = geometry.with_skin(SkinAttributes {
                joints: joints.into_u16().collect(),
                weights: weights.into_f32().collect(),
            });
        }

        let material = self.build_material(&primitive.material())?;
        Ok(Some(Mesh::new(name, Arc::new(geometry), material)))
    }

    fn build_material(&mut self, material: &gltf::Material) -> Result<Material> {
        let pbr = material.pbr_metallic_roughness();
        let mut engine_mat = Material {
            color: Vec4::from_array(pbr.base_color_factor()),
            metalness: pbr.metallic_factor(),
            roughness: pbr.roughness_factor(),
            map: None,
        };
        if let Some(info) = pbr.base_color_texture() {
            engine_mat.map = Some(self.image(info.texture().source())?);
        }
        Ok(engine_mat)
    }

    /// Decodes each glTF image once.
    fn image(&mut self, image: gltf::Image) -> Result<Arc<Image>> {
        if let Some(Some(cached)) = self.images.get(image.index()) {
            return Ok(cached.clone());
        }

        let decoded = match image.source() {
            gltf::image::Source::Uri { uri, .. } => {
                let path = self.base_path.join(uri);
                Image::decode(&fs::read(&path)?)?
            }
            gltf::image::Source::View { view, .. } => {
                let start = view.offset();
                let end = start + view.length();
                let bytes = self
                    .buffers
                    .get(view.buffer().index())
                    .and_then(|b| b.get(start..end))
                    .ok_or_else(|| JourneyError::GltfError("image view out of bounds".into()))?;
                Image::decode(bytes)?
            }
        };

        let decoded = Arc::new(decoded);
        if let Some(slot) = self.images.get_mut(image.index()) {
            *slot = Some(decoded.clone());
        }
        Ok(decoded)
    }

    fn load_animations(&self) -> Result<Vec<AnimationClip>> {
        let mut clips = Vec::new();

        for anim in self.document.animations() {
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| self.buffers.get(buffer.index()).map(Vec::as_slice));
                let target = channel.target();
                let Some(node) = target.node() else {
                    continue;
                };
                let node_name = node
                    .name()
                    .map_or_else(|| format!("Node_{}", node.index()), str::to_string);

                let Some(inputs) = reader.read_inputs() else {
                    continue;
                };
                let times: Vec<f32> = inputs.collect();
                let Some(outputs) = reader.read_outputs() else {
                    continue;
                };

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                let (target_path, data) = match outputs {
                    ReadOutputs::Translations(iter) => (
                        TargetPath::Translation,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    ReadOutputs::Rotations(iter) => (
                        TargetPath::Rotation,
                        TrackData::Quaternion(KeyframeTrack::new(
                            times,
                            iter.into_f32().map(Quat::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    ReadOutputs::Scales(iter) => (
                        TargetPath::Scale,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    ReadOutputs::MorphTargetWeights(_) => continue,
                };

                tracks.push(Track {
                    meta: TrackMeta {
                        node_name,
                        target: target_path,
                    },
                    data,
                });
            }

            let name = anim
                .name()
                .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
            clips.push(AnimationClip::new(name, tracks));
        }

        Ok(clips)
    }
}

fn load_buffers(document: &gltf::Gltf, base_path: &Path) -> Result<Vec<Vec<u8>>> {
    let mut buffers = Vec::new();
    for buffer in document.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = document
                    .blob
                    .as_deref()
                    .ok_or_else(|| JourneyError::GltfError("missing GLB binary chunk".into()))?;
                buffers.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                let path = base_path.join(uri);
                let data = fs::read(&path).map_err(|e| {
                    JourneyError::GltfError(format!("failed to read buffer '{}': {e}", path.display()))
                })?;
                buffers.push(data);
            }
        }
    }
    Ok(buffers)
}
