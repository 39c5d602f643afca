use fnv::FnvHashMap;

/// Material selected for a renderable during a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Material {
    Lit,
    /// Flat black silhouette used only while isolating the bloom layer.
    UnlitBlack,
}

/// What a scene node draws. Photo slots carry their slot id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Particles,
    Markers,
    Photo(u32),
}

#[derive(Clone, Copy, Debug)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub material: Material,
    pub bloom_layer: bool,
}

impl SceneNode {
    pub fn new(kind: NodeKind, bloom_layer: bool) -> Self {
        Self {
            kind,
            material: Material::Lit,
            bloom_layer,
        }
    }
}

/// Ordered draw list walked by both render passes.
#[derive(Default)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new(nodes: Vec<SceneNode>) -> Self {
        Self { nodes }
    }
}

/// Scoped material substitution for the bloom-isolation pass: every
/// non-bloom node renders flat black while this guard is alive, and the
/// original materials are restored on drop — on every exit path, so the
/// visible scene never renders substituted.
pub struct DarkenNonBloom<'a> {
    scene: &'a mut Scene,
    saved: FnvHashMap<usize, Material>,
}

impl<'a> DarkenNonBloom<'a> {
    pub fn new(scene: &'a mut Scene) -> Self {
        let mut saved = FnvHashMap::default();
        for (i, node) in scene.nodes.iter_mut().enumerate() {
            if !node.bloom_layer && node.material != Material::UnlitBlack {
                saved.insert(i, node.material);
                node.material = Material::UnlitBlack;
            }
        }
        Self { scene, saved }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }
}

impl Drop for DarkenNonBloom<'_> {
    fn drop(&mut self) {
        for (i, material) in self.saved.drain() {
            if let Some(node) = self.scene.nodes.get_mut(i) {
                node.material = material;
            }
        }
    }
}
