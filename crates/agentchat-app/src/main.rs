mod cli;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use agentchat_api::{resolve_base_url, FileUpload, HttpAgentApi};
use agentchat_chat::{Conversation, Sender, SettingsEngine, SubmitOutcome};
use agentchat_store::{get_or_create_session_id, LlmPatch, LocalStore, ModelType, Provider};

fn print_message(msg: &agentchat_chat::Message) {
    let prefix = match msg.sender {
        Sender::User => "you",
        Sender::Ai => "agent",
        Sender::System => "system",
    };
    println!("{prefix}> {}", msg.content);
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("agentchat=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "agentchat=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("agentchat v{} starting...", env!("CARGO_PKG_VERSION"));

    let store = match LocalStore::open() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("cannot open local store: {e}");
            std::process::exit(1);
        }
    };

    let session_id = match get_or_create_session_id(&store) {
        Ok(sid) => sid,
        Err(e) => {
            eprintln!("cannot establish session id: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(session_id = %session_id, "session established");

    let env_url = std::env::var("AGENTCHAT_API_URL").ok();
    let base_url = resolve_base_url(
        args.api_url.as_deref().or(env_url.as_deref()),
        None,
    );
    tracing::info!("backend: {base_url}");
    let api = HttpAgentApi::new(base_url);

    let mut engine = SettingsEngine::new(store);
    let settings = engine.load(&api, &session_id).await;
    tracing::info!(provider = ?settings.llm.provider, "settings resolved");

    let mut conversation = Conversation::new(Some(session_id));
    let mut pending_files: Vec<FileUpload> = Vec::new();

    println!("agentchat — type a message, /help for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim().to_string();

        match line.split_once(' ').map_or((line.as_str(), ""), |(c, r)| (c, r.trim())) {
            ("/quit", _) | ("/exit", _) => break,
            ("/help", _) => {
                println!("  /attach <path>    attach a file to the next message");
                println!("  /clear            clear conversation history");
                println!("  /settings         show current settings");
                println!("  /provider <name>  set llm provider (azure, openai, local)");
                println!("  /model <name>     set openai model name");
                println!("  /temp <0..1>      set sampling temperature");
                println!("  /quit             exit");
            }
            ("/settings", _) => {
                println!("{:#?}", engine.settings());
            }
            ("/attach", path) if !path.is_empty() => match tokio::fs::read(path).await {
                Ok(bytes) => {
                    let name = std::path::Path::new(path)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.to_string());
                    println!("attached {name} ({} bytes)", bytes.len());
                    pending_files.push(FileUpload::new(name, bytes));
                }
                Err(e) => println!("cannot read {path}: {e}"),
            },
            ("/clear", _) => {
                println!("clear conversation history? this cannot be undone [y/N]");
                let confirmed = matches!(
                    lines.next_line().await,
                    Ok(Some(answer)) if answer.trim().eq_ignore_ascii_case("y")
                );
                if !confirmed {
                    println!("not cleared");
                    continue;
                }
                if conversation.clear_history(&api).await {
                    println!("history cleared");
                }
            }
            ("/provider", name) => {
                let provider = match name {
                    "azure" => Some(Provider::Azure),
                    "openai" => Some(Provider::Openai),
                    "local" => Some(Provider::Local),
                    _ => None,
                };
                match provider {
                    Some(provider) => {
                        let patch = LlmPatch {
                            provider: Some(provider),
                            // Local models default to the quantized build.
                            model_type: (provider == Provider::Local)
                                .then_some(ModelType::Quantized),
                            ..Default::default()
                        };
                        report_mirror(engine.update_llm(&api, patch).await);
                    }
                    None => println!("unknown provider: {name}"),
                }
            }
            ("/model", name) if !name.is_empty() => {
                let patch = LlmPatch {
                    model_name: Some(name.to_string()),
                    ..Default::default()
                };
                report_mirror(engine.update_llm(&api, patch).await);
            }
            ("/temp", value) => match value.parse::<f32>() {
                Ok(t) if (0.0..=1.0).contains(&t) => {
                    let patch = LlmPatch {
                        temperature: Some(t),
                        ..Default::default()
                    };
                    report_mirror(engine.update_llm(&api, patch).await);
                }
                _ => println!("temperature must be a number in 0..1"),
            },
            (cmd, _) if cmd.starts_with('/') => {
                println!("unknown or incomplete command: {cmd} (see /help)");
            }
            _ => {
                let files = std::mem::take(&mut pending_files);
                match conversation.submit(&api, &line, files).await {
                    SubmitOutcome::Sent => {
                        if let Some(msg) = conversation.messages().last() {
                            print_message(msg);
                        }
                    }
                    SubmitOutcome::Ignored => {}
                    SubmitOutcome::Busy => println!("still waiting on the last message"),
                }
            }
        }
    }

    tracing::info!("shutdown complete");
}

fn report_mirror(mirrored: bool) {
    if mirrored {
        println!("settings saved");
    } else {
        println!("settings saved locally; backend sync failed");
    }
}
