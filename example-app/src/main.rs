//! # 示例应用程序
//!
//! 在内存场景图中搭建一个登录界面，演示场景字段绑定器的用法

use clap::Parser;
use di_abstractions::{Bindable, BindingManifest, LoadSceneMode, NodeRef, SceneHost};
use di_impl::InMemorySceneHost;
use infrastructure_composition::{BinderBuilder, LoggingConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "场景字段绑定器示例应用")]
struct Args {
    /// 配置文件路径（TOML）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 环境变量前缀
    #[arg(long, default_value = "SCENE_BIND")]
    env_prefix: String,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 使用 JSON 格式输出日志
    #[arg(long)]
    json_logs: bool,

    /// 不创建 Stage 按钮列表的父对象，演示列表绑定失败
    #[arg(long)]
    without_stages: bool,
}

/// 内置按钮组件
#[derive(Debug)]
struct Button {
    label: String,
}

/// 内置文本组件
#[derive(Debug)]
struct TextMeshProUGUI {
    text: String,
}

/// 用户自定义组件，不加前缀
#[derive(Debug)]
struct AudioDirector;

/// 登录界面
#[derive(Debug)]
struct LoginPanel {
    node: NodeRef,
    login_button: Option<Arc<Button>>,
    title: Option<Arc<TextMeshProUGUI>>,
    director: Option<Arc<AudioDirector>>,
    stage_buttons: Box<[Arc<Button>]>,
    footer: Option<NodeRef>,
    popup: Option<NodeRef>,
}

impl Bindable for LoginPanel {
    fn node(&self) -> NodeRef {
        self.node
    }

    fn manifest() -> BindingManifest<Self> {
        BindingManifest::builder()
            .search_root("_footer", |panel: &LoginPanel| panel.footer)
            .bind::<Button>("_loginButton", |panel: &mut LoginPanel, button| {
                panel.login_button = Some(button)
            })
            .bind::<TextMeshProUGUI>("m_title", |panel, text| panel.title = Some(text))
            .bind_root::<AudioDirector>("_audioDirector", |panel, director| {
                panel.director = Some(director)
            })
            .bind_array::<Button>("_stageButtons", |panel, buttons| panel.stage_buttons = buttons)
            .bind_node("_popup", |panel, node| panel.popup = Some(node))
            .named("_confirmPopup")
            .build()
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = LoggingConfig {
        level: parse_log_level(&args.log_level),
        json_format: args.json_logs,
        ..LoggingConfig::default()
    };

    let host = Arc::new(InMemorySceneHost::new());
    let (panel_node, footer_node) = build_scene(&host, !args.without_stages);

    let mut builder = BinderBuilder::new()
        .with_logging(logging)
        .add_config_env_vars(args.env_prefix.clone());
    if let Some(path) = &args.config {
        builder = builder.add_config_toml(path)?;
    }
    let binder = builder.build(host.clone())?;
    binder.start()?;

    let mut panel = LoginPanel {
        node: panel_node,
        login_button: None,
        title: None,
        director: None,
        stage_buttons: Box::default(),
        footer: Some(footer_node),
        popup: None,
    };
    let report = binder.bind(&mut panel)?;

    info!(
        login = ?panel.login_button.as_ref().map(|b| b.label.as_str()),
        title = ?panel.title.as_ref().map(|t| t.text.as_str()),
        director = panel.director.is_some(),
        stages = panel.stage_buttons.len(),
        popup = ?panel.popup.and_then(|n| host.node_name(n)),
        "登录界面绑定完成"
    );
    println!("{}", serde_json::to_string_pretty(&report.summary())?);

    binder.shutdown()?;
    Ok(())
}

/// 搭建演示场景，返回登录界面节点和页脚节点
fn build_scene(host: &InMemorySceneHost, with_stages: bool) -> (NodeRef, NodeRef) {
    let ui = host.create_scene("UI");
    let canvas = host.spawn_root(ui, "Canvas_Main");
    let panel = host.spawn_child(canvas, "LoginPanel");

    let login = host.spawn_child(panel, "Button_LoginButton");
    host.add_component(login, Button {
        label: "登录".to_string(),
    });
    let title = host.spawn_child(panel, "Text (TMP)_Title");
    host.add_component(title, TextMeshProUGUI {
        text: "欢迎".to_string(),
    });

    if with_stages {
        let stages = host.spawn_child(panel, "Button_StageButtons");
        for index in 1..=3 {
            let stage = host.spawn_child(stages, format!("Stage{index}"));
            host.add_component(stage, Button {
                label: format!("关卡 {index}"),
            });
        }
        host.spawn_child(stages, "Divider");
    }

    let footer = host.spawn_root(ui, "Footer");
    host.spawn_child(footer, "ConfirmPopup");

    let systems = host.create_scene("Systems");
    let director = host.spawn_root(systems, "AudioDirector");
    host.add_component(director, AudioDirector);

    host.load_scene(ui, LoadSceneMode::Single);
    host.load_scene(systems, LoadSceneMode::Additive);
    (panel, footer)
}

fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
