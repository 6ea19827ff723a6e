//! 场景字段绑定器的集中集成测试
use di_abstractions::{
    Bindable, BindingManifest, FieldOutcome, LoadSceneMode, ManifestRegistry, NodeRef, SceneHost,
};
use di_impl::{InMemorySceneHost, NodeFinder, SceneRootCache};
use infrastructure_common::{
    BinderOptions, BindingError, InfrastructureError, NameMangler, PrefixTable,
};
use infrastructure_composition::{BinderBuilder, SceneBinder};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 测试组件
#[derive(Debug)]
struct Button {
    id: u32,
}

#[derive(Debug)]
struct Toggle;

#[derive(Debug)]
struct ScoreBoard;

fn binder(host: &Arc<InMemorySceneHost>) -> SceneBinder {
    BinderBuilder::new()
        .with_manifest_registry(Arc::new(ManifestRegistry::new()))
        .build(host.clone())
        .unwrap()
}

#[test]
fn test_name_mangling_conventions() {
    let table = PrefixTable::standard();
    let mangler = NameMangler::new(&table);
    let button = infrastructure_common::TypeInfo::of::<Button>();
    let score = infrastructure_common::TypeInfo::of::<ScoreBoard>();

    assert_eq!(mangler.mangle("_loginButton", Some(&button)).unwrap(), "Button_LoginButton");
    assert_eq!(mangler.mangle("m_loginButton", Some(&button)).unwrap(), "Button_LoginButton");
    assert_eq!(mangler.mangle("_scoreBoard", Some(&score)).unwrap(), "ScoreBoard");
    assert_eq!(mangler.mangle("_x", None).unwrap(), "X");
    assert_eq!(
        mangler.mangle("_", Some(&button)).unwrap_err(),
        BindingError::invalid_name("_")
    );
    assert!(mangler.mangle("_", None).unwrap_err().is_configuration_fault());
}

struct Menu {
    node: NodeRef,
    target: Option<NodeRef>,
    toggles: Vec<Arc<Toggle>>,
}

impl Bindable for Menu {
    fn node(&self) -> NodeRef {
        self.node
    }

    fn manifest() -> BindingManifest<Self> {
        BindingManifest::builder()
            .bind_node("_target", |menu: &mut Menu, node| menu.target = Some(node))
            .bind_list::<Toggle>("_options", |menu, toggles| menu.toggles = toggles)
            .build()
    }
}

#[test]
fn test_self_match_precedes_descendants() {
    init_test_logger();
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let own = host.spawn_root(scene, "Target");
    let _child = host.spawn_child(own, "Target");
    host.load_scene(scene, LoadSceneMode::Single);

    let binder = binder(&host);
    let mut menu = Menu {
        node: own,
        target: None,
        toggles: Vec::new(),
    };
    binder.bind(&mut menu).unwrap();
    assert_eq!(menu.target, Some(own));
}

#[test]
fn test_first_match_wins_across_subtrees() {
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let root = host.spawn_root(scene, "Root");
    let a = host.spawn_child(root, "A");
    let nested = host.spawn_child(a, "Deep");
    let b = host.spawn_child(root, "B");
    let _later = host.spawn_child(b, "Deep");

    let finder = NodeFinder::new(&*host);
    assert_eq!(finder.find(&[root], "Deep"), Some(nested));

    // 直属子节点先于更早兄弟节点下的后代
    let direct = host.spawn_child(root, "Deep");
    assert_eq!(finder.find(&[root], "Deep"), Some(direct));
}

#[test]
fn test_pre_order_below_search_root() {
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let root = host.spawn_root(scene, "Root");
    let a = host.spawn_child(root, "A");
    let b = host.spawn_child(a, "B");
    let deep = host.spawn_child(b, "Target");
    let _shallow = host.spawn_child(a, "Target");

    let finder = NodeFinder::new(&*host);
    assert_eq!(finder.find(&[root], "Target"), Some(deep));
}

#[test]
fn test_list_binding_skips_children_without_component() {
    init_test_logger();
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let own = host.spawn_root(scene, "Menu");
    let options = host.spawn_child(own, "Toggle_Options");
    let first = host.add_component(host.spawn_child(options, "Sound"), Toggle);
    host.spawn_child(options, "Label");
    let third = host.add_component(host.spawn_child(options, "Music"), Toggle);
    host.load_scene(scene, LoadSceneMode::Single);

    let binder = binder(&host);
    let mut menu = Menu {
        node: own,
        target: None,
        toggles: Vec::new(),
    };
    let report = binder.bind(&mut menu).unwrap();

    assert_eq!(menu.toggles.len(), 2);
    assert!(Arc::ptr_eq(&menu.toggles[0], &first));
    assert!(Arc::ptr_eq(&menu.toggles[1], &third));

    let options = report.field("_options").unwrap();
    assert_eq!(options.skipped_children, vec!["Label".to_string()]);
    assert_eq!(options.warning_count(), 1);
    assert_eq!(
        options.outcome,
        FieldOutcome::Bound {
            target: "Toggle_Options".to_string(),
            elements: 2
        }
    );
}

#[test]
fn test_list_binding_missing_parent() {
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let own = host.spawn_root(scene, "Menu");
    host.spawn_child(own, "Target");
    host.load_scene(scene, LoadSceneMode::Single);

    let binder = binder(&host);
    let mut menu = Menu {
        node: own,
        target: None,
        toggles: Vec::new(),
    };
    let report = binder.bind(&mut menu).unwrap();

    assert!(menu.toggles.is_empty());
    assert!(menu.target.is_some());
    assert_eq!(report.warning_count(), 1);
    assert!(matches!(
        report.field("_options").unwrap().outcome.error(),
        Some(BindingError::ParentNotFound { .. })
    ));
}

#[test]
fn test_empty_list_is_still_bound() {
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let own = host.spawn_root(scene, "Menu");
    host.spawn_child(own, "Toggle_Options");
    host.load_scene(scene, LoadSceneMode::Single);

    let binder = binder(&host);
    let mut menu = Menu {
        node: own,
        target: None,
        toggles: vec![Arc::new(Toggle)],
    };
    let report = binder.bind(&mut menu).unwrap();
    assert!(menu.toggles.is_empty());
    assert!(report.field("_options").unwrap().outcome.is_bound());
}

#[test]
fn test_scene_root_cache_collision_and_membership() {
    let host = Arc::new(InMemorySceneHost::new());
    let first = host.create_scene("First");
    let second = host.create_scene("Second");
    let manager = host.spawn_root(first, "GameManager");
    host.spawn_root(second, "GameManager");
    let hud = host.spawn_root(second, "Hud");
    host.spawn_child(hud, "Hidden");
    host.load_scene(first, LoadSceneMode::Single);
    host.load_scene(second, LoadSceneMode::Additive);

    let cache = SceneRootCache::new(host.clone());
    let mut names = cache.names();
    names.sort();
    assert_eq!(names, vec!["GameManager".to_string(), "Hud".to_string()]);
    assert_eq!(cache.try_get("GameManager"), Some(manager));
    assert_eq!(cache.try_get("Hidden"), None);
}

struct Scoreboard {
    node: NodeRef,
    board: Option<Arc<ScoreBoard>>,
    start: Option<Arc<Button>>,
    anchor: Option<NodeRef>,
}

impl Bindable for Scoreboard {
    fn node(&self) -> NodeRef {
        self.node
    }

    fn manifest() -> BindingManifest<Self> {
        BindingManifest::builder()
            .search_root("_anchor", |s: &Scoreboard| s.anchor)
            .bind_root::<ScoreBoard>("_board", |s: &mut Scoreboard, board| s.board = Some(board))
            .named("_scoreBoard")
            .bind::<Button>("_start", |s, button| s.start = Some(button))
            .build()
    }
}

#[test]
fn test_scene_root_retry_and_auxiliary_root() {
    init_test_logger();
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let own = host.spawn_root(scene, "Scoreboard");
    let anchor = host.spawn_root(scene, "Controls");
    let start = host.spawn_child(anchor, "Button_Start");
    host.add_component(start, Button { id: 7 });
    host.load_scene(scene, LoadSceneMode::Single);

    let binder = binder(&host);
    let refreshes = binder.cache().refresh_count();

    // 缓存构建之后才创建的根对象
    let board = host.spawn_root(scene, "ScoreBoard");
    host.add_component(board, ScoreBoard);

    let mut scoreboard = Scoreboard {
        node: own,
        board: None,
        start: None,
        anchor: None,
    };
    let report = binder.bind(&mut scoreboard).unwrap();
    assert!(scoreboard.board.is_some());
    assert_eq!(binder.cache().refresh_count(), refreshes + 1);
    assert!(scoreboard.start.is_none());
    assert_eq!(report.ignored_roots, vec!["_anchor".to_string()]);

    scoreboard.anchor = Some(anchor);
    let report = binder.bind(&mut scoreboard).unwrap();
    assert_eq!(scoreboard.start.as_ref().map(|b| b.id), Some(7));
    assert_eq!(report.search_roots, vec![own, anchor]);
    assert!(report.is_clean());
}

#[test]
fn test_scene_root_double_miss_leaves_field_unset() {
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let own = host.spawn_root(scene, "Scoreboard");
    host.load_scene(scene, LoadSceneMode::Single);

    let binder = binder(&host);
    let mut scoreboard = Scoreboard {
        node: own,
        board: None,
        start: None,
        anchor: None,
    };
    let report = binder.bind(&mut scoreboard).unwrap();
    assert!(scoreboard.board.is_none());
    assert!(matches!(
        report.field("_board").unwrap().outcome.error(),
        Some(BindingError::SceneRootNotFound { target, .. }) if target == "ScoreBoard"
    ));
}

#[test]
fn test_binding_is_idempotent() {
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let own = host.spawn_root(scene, "Menu");
    host.spawn_child(own, "Target");
    let options = host.spawn_child(own, "Toggle_Options");
    host.add_component(host.spawn_child(options, "One"), Toggle);
    host.spawn_child(options, "Two");
    host.load_scene(scene, LoadSceneMode::Single);

    let binder = binder(&host);
    let mut menu = Menu {
        node: own,
        target: None,
        toggles: Vec::new(),
    };
    let first = binder.bind(&mut menu).unwrap();
    let first_target = menu.target;
    let first_toggles: Vec<_> = menu.toggles.clone();

    let second = binder.bind(&mut menu).unwrap();
    assert_eq!(first, second);
    assert_eq!(menu.target, first_target);
    assert_eq!(menu.toggles.len(), first_toggles.len());
    assert!(menu
        .toggles
        .iter()
        .zip(first_toggles.iter())
        .all(|(a, b)| Arc::ptr_eq(a, b)));
}

struct ShortName {
    node: NodeRef,
    value: Option<NodeRef>,
}

impl Bindable for ShortName {
    fn node(&self) -> NodeRef {
        self.node
    }

    fn manifest() -> BindingManifest<Self> {
        BindingManifest::builder()
            .bind_node("m_", |s: &mut ShortName, node| s.value = Some(node))
            .build()
    }
}

#[test]
fn test_short_name_is_configuration_fault() -> anyhow::Result<()> {
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let own = host.spawn_root(scene, "Owner");
    host.load_scene(scene, LoadSceneMode::Single);

    let strict = binder(&host);
    let mut owner = ShortName {
        node: own,
        value: None,
    };
    let err = strict.bind(&mut owner).unwrap_err();
    assert!(matches!(
        err,
        InfrastructureError::BindingError {
            source: BindingError::InvalidName { .. }
        }
    ));

    let lenient = BinderBuilder::new()
        .with_manifest_registry(Arc::new(ManifestRegistry::new()))
        .with_options(BinderOptions {
            fail_on_invalid_name: false,
            ..BinderOptions::default()
        })
        .build(host.clone())?;
    let report = lenient.bind(&mut owner)?;
    assert_eq!(report.unbound_count(), 1);
    assert!(owner.value.is_none());
    Ok(())
}

#[test]
fn test_destroyed_host_node_names() {
    let host = Arc::new(InMemorySceneHost::new());
    let scene = host.create_scene("Main");
    let own = host.spawn_root(scene, "Menu");
    let target = host.spawn_child(own, "Target");
    host.load_scene(scene, LoadSceneMode::Single);
    assert_eq!(host.node_name(target).as_deref(), Some("Target"));

    host.destroy_node(target);
    let binder = binder(&host);
    let mut menu = Menu {
        node: own,
        target: None,
        toggles: Vec::new(),
    };
    let report = binder.bind(&mut menu).unwrap();
    assert!(menu.target.is_none());
    assert!(matches!(
        report.field("_target").unwrap().outcome.error(),
        Some(BindingError::NodeNotFound { .. })
    ));
}
