use std::convert::Infallible;
use std::rc::Rc;

use inertia_app::{
    AppConfig, Collaborators, Component, ComponentRegistry, Layout, Node, Page, RenderTree,
};
use inertia_app_shell::{AppShell, Renderer};
use inertia_testing::{FakeHeadManagerFactory, FakeRouter};

const MAX_FRAMES_PER_VISIT: u64 = 8;

const SCRIPT: &[(&str, &str)] = &[
    (
        "open the dashboard",
        r#"{"component": "Dashboard", "props": {"user": "ada"}, "url": "/dashboard"}"#,
    ),
    (
        "open the invite dialog over the user list",
        r#"{"component": "Users", "props": {"count": 3}, "url": "/users/invite",
            "dialog": {"component": "Invite", "props": {"team": "core"}}}"#,
    ),
    (
        "move to settings with the invite dialog still open",
        r#"{"component": "Settings", "props": {}, "url": "/settings/invite",
            "dialog": {"component": "Invite", "props": {"team": "ops"}}}"#,
    ),
    (
        "close the dialog",
        r#"{"component": "Settings", "props": {}, "url": "/settings"}"#,
    ),
];

struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    type Error = Infallible;

    fn commit(&mut self, frame: u64, tree: &RenderTree) -> Result<(), Self::Error> {
        println!("  frame {frame}:");
        for node in tree {
            print_node(node, 2);
        }
        Ok(())
    }
}

fn print_node(node: &Node, depth: usize) {
    let key = node
        .key
        .map(|key| format!(" key={key}"))
        .unwrap_or_default();
    println!("{:indent$}{}{key} {:?}", "", node.name(), node.props, indent = depth * 2);
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn registry() -> ComponentRegistry {
    let app_layout = Component::named("AppLayout");
    let nav = Component::named("Navigation");
    let mut registry = ComponentRegistry::new();
    registry
        .register(Component::named("Dashboard"))
        .register(
            Component::builder("Users")
                .layout(Layout::chain([app_layout.clone(), nav]))
                .build(),
        )
        .register(
            Component::builder("Settings")
                .layout(Layout::Persistent(app_layout))
                .build(),
        )
        .register(Component::builder("Invite").dialog_key("invite").build());
    registry
}

fn main() {
    env_logger::init();

    println!("=== Inertia navigation walkthrough ===");

    let router = Rc::new(FakeRouter::new());
    let collaborators = Collaborators {
        router: router.clone(),
        head_manager_factory: Rc::new(FakeHeadManagerFactory::new()),
        form_helper: None,
    };
    let initial = match Page::from_json(r#"{"component": "Welcome", "props": {}, "url": "/"}"#) {
        Ok(page) => page,
        Err(err) => {
            log::error!("bad initial page: {err}");
            return;
        }
    };
    let config = AppConfig::new(initial)
        .initial_component(Component::named("Welcome"))
        .resolve_component(registry())
        .title_callback(|title| format!("{title} | Demo"));

    println!("\n> boot");
    let mut shell = match AppShell::launch(ConsoleRenderer, config, collaborators) {
        Ok(shell) => shell,
        Err(err) => {
            log::error!("setup failed: {err}");
            return;
        }
    };

    for (step, raw) in SCRIPT {
        println!("\n> {step}");
        let page = match Page::from_json(raw) {
            Ok(page) => page,
            Err(err) => {
                log::error!("skipping `{step}`: {err}");
                continue;
            }
        };
        if let Err(err) = router.visit(page, false) {
            log::error!("visit failed: {err}");
            continue;
        }
        shell.run_until_idle(MAX_FRAMES_PER_VISIT);
        if let Some(dialog) = shell.app().context().dialog.data.value() {
            println!(
                "  dialog `{}`: open={} appear={}",
                dialog.component, dialog.open, dialog.appear
            );
        }
    }

    println!("\n{} frame(s) committed", shell.frame());
}
