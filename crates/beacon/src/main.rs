//! Terminal front-end for the Beacon search orchestrator.
//!
//! Reads query lines from stdin, feeds them to a [`SearchSession`] and
//! prints the aggregated sections once results settle. Colon commands
//! control the session: `:fuzzy on|off`, `:enable <provider>`,
//! `:disable <provider>`, `:providers`, `:open <n>`, `:quit`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beacon_core::{
    ActionRegistry, Config, ProviderRegistry, ResultAggregator, ResultItem, SearchSession,
    Section, TomlPreferences,
};
use beacon_providers::{
    builtin_commands, CalcProvider, CommandProvider, CopyActionFactory, FileProvider,
    OpenActionFactory, SnippetProvider, SnippetRunner, WikiProvider,
};

fn expand_root(root: &str) -> PathBuf {
    if let Some(rest) = root.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.trim_start_matches('/');
            return if rest.is_empty() { home } else { home.join(rest) };
        }
    }
    PathBuf::from(root)
}

fn snippet_runners(config: &Config) -> Vec<SnippetRunner> {
    if config.snippet_runners.is_empty() {
        return vec![
            SnippetRunner::new("Python", &["py"]),
            SnippetRunner::new("Shell", &["sh", "bash"]),
        ];
    }
    config
        .snippet_runners
        .iter()
        .map(|r| SnippetRunner {
            name: r.name.clone(),
            aliases: r.aliases.clone(),
        })
        .collect()
}

fn build_registry(config: &Config) -> ProviderRegistry {
    let registry = ProviderRegistry::with_prefs(Box::new(TomlPreferences::open(
        Config::prefs_path(),
    )));

    registry.register(Arc::new(SnippetProvider::new(snippet_runners(config))), 100);
    registry.register(Arc::new(CalcProvider::new()), 90);
    registry.register(Arc::new(CommandProvider::new(builtin_commands())), 80);
    registry.register(
        Arc::new(FileProvider::new(
            expand_root(&config.files.root),
            config.files.max_depth as usize,
        )),
        70,
    );
    registry.register(
        Arc::new(WikiProvider::new(
            config.wiki.endpoint.clone(),
            config.wiki.max_results as usize,
        )),
        10,
    );

    registry
}

fn render(sections: &[Section]) {
    if sections.is_empty() {
        println!("  (no results)");
        return;
    }
    let mut index = 0;
    for section in sections {
        println!("[{}]", section.title);
        if section.results.is_empty() {
            println!("  (empty)");
        }
        for item in &section.results {
            index += 1;
            if item.context.is_empty() {
                println!("  {index}. {}", item.name);
            } else {
                println!("  {index}. {}  ({})", item.name, item.context);
            }
        }
    }
}

fn nth_result(sections: &[Section], n: usize) -> Option<&ResultItem> {
    sections.iter().flat_map(|s| &s.results).nth(n.checked_sub(1)?)
}

async fn read_line() -> anyhow::Result<Option<String>> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
            Err(err) => Err(err.into()),
        }
    })
    .await?
}

/// Wait until the generation triggered by the last edit has reported,
/// then give a short grace period for stragglers.
async fn settle(config: &Config, dirty: &AtomicBool) {
    let debounce = Duration::from_millis(config.search.debounce_ms);
    tokio::time::sleep(debounce + Duration::from_millis(100)).await;
    for _ in 0..20 {
        if dirty.swap(false, Ordering::SeqCst) {
            // Something arrived; wait one more beat for siblings.
            tokio::time::sleep(Duration::from_millis(150)).await;
        } else {
            break;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beacon=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load();
    tracing::debug!(path = %Config::config_path().display(), "configuration loaded");
    let registry = Arc::new(build_registry(&config));

    let actions = ActionRegistry::new();
    actions.register(Arc::new(OpenActionFactory), 10);
    actions.register(Arc::new(CopyActionFactory), 0);

    let aggregator = Arc::new(ResultAggregator::new(config.search.max_results as usize));
    let dirty = Arc::new(AtomicBool::new(false));

    let sink = Arc::clone(&aggregator);
    let flag = Arc::clone(&dirty);
    let session = SearchSession::new(
        Arc::clone(&registry),
        config.search.session(),
        vec![Box::new(move |event| {
            sink.on_event(event);
            flag.store(true, Ordering::SeqCst);
        })],
    );

    println!("beacon: type to search, :help for commands");

    loop {
        let Some(line) = read_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            let mut parts = command.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("quit"), _) | (Some("q"), _) => break,
                (Some("fuzzy"), Some(state)) => {
                    session.set_fuzzy(state == "on");
                    settle(&config, &dirty).await;
                    render(&aggregator.snapshot());
                }
                (Some("enable"), Some(id)) => registry.set_enabled(id, true),
                (Some("disable"), Some(id)) => registry.set_enabled(id, false),
                (Some("providers"), _) => {
                    for entry in registry.providers() {
                        let state = if entry.is_enabled() { "on" } else { "off" };
                        println!("  {}  [{state}]", entry.handle().title);
                    }
                }
                (Some("open"), Some(n)) => {
                    let sections = aggregator.snapshot();
                    match n.parse().ok().and_then(|n| nth_result(&sections, n)) {
                        Some(item) => match actions.actions_for(item).first() {
                            Some(action) => {
                                action.run();
                                if action.closes_search() {
                                    break;
                                }
                            }
                            None => println!("no action for '{}'", item.name),
                        },
                        None => println!("no such result"),
                    }
                }
                (Some("help"), _) => {
                    println!(":fuzzy on|off, :enable <provider>, :disable <provider>,");
                    println!(":providers, :open <n>, :quit");
                }
                _ => println!("unknown command (try :help)"),
            }
            continue;
        }

        aggregator.clear();
        session.update_query(line);
        settle(&config, &dirty).await;
        render(&aggregator.snapshot());
    }

    session.terminate();
    Ok(())
}
