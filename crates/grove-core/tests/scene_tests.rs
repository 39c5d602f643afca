use grove_core::scene::{DarkenNonBloom, Material, NodeKind, Scene, SceneNode};

fn demo_scene() -> Scene {
    Scene::new(vec![
        SceneNode::new(NodeKind::Particles, true),
        SceneNode::new(NodeKind::Markers, true),
        SceneNode::new(NodeKind::Photo(0), false),
        SceneNode::new(NodeKind::Photo(1), false),
    ])
}

#[test]
fn guard_substitutes_only_non_bloom_nodes() {
    let mut scene = demo_scene();
    let guard = DarkenNonBloom::new(&mut scene);
    for node in &guard.scene().nodes {
        if node.bloom_layer {
            assert_eq!(node.material, Material::Lit);
        } else {
            assert_eq!(node.material, Material::UnlitBlack);
        }
    }
}

#[test]
fn guard_restores_all_originals_on_drop() {
    let mut scene = demo_scene();
    {
        let _guard = DarkenNonBloom::new(&mut scene);
    }
    for node in &scene.nodes {
        assert_eq!(
            node.material,
            Material::Lit,
            "material left substituted after the guard dropped"
        );
    }
}

#[test]
fn guard_restores_even_when_the_render_panics() {
    let mut scene = demo_scene();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = DarkenNonBloom::new(&mut scene);
        panic!("surface lost mid-pass");
    }));
    assert!(result.is_err());
    for node in &scene.nodes {
        assert_eq!(node.material, Material::Lit);
    }
}

#[test]
fn repeated_guard_cycles_never_leak_substitutions() {
    let mut scene = demo_scene();
    for _ in 0..5 {
        {
            let guard = DarkenNonBloom::new(&mut scene);
            assert_eq!(guard.scene().nodes[2].material, Material::UnlitBlack);
        }
        assert!(scene.nodes.iter().all(|n| n.material == Material::Lit));
    }
}
