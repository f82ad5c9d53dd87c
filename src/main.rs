use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use jaimes::diagnosis::{ConversationTurn, DiagnosticController, SymptomCatalog};
use jaimes::kernel::event::{Event, InputEvent};
use jaimes::kernel::reactor::Reactor;
use jaimes::kernel::state::SessionId;
use jaimes::services::llm::LlmService;
use jaimes::session::{FileSessionStore, InMemorySessionStore, SessionStore};
use jaimes::JaimesConfig;

const RESET_COMMAND: &str = "/reset";

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = JaimesConfig::from_env()?;
    tracing::info!("Jaimes booting with {:?}", config);

    let catalog = match &config.catalog_path {
        Some(path) => SymptomCatalog::load_or_empty(path),
        None => SymptomCatalog::empty(),
    };
    let controller = DiagnosticController::new(Arc::new(catalog), config.policy.clone());

    let store: Box<dyn SessionStore + Send> = match &config.session_dir {
        Some(dir) => Box::new(FileSessionStore::new(dir.clone())?),
        None => Box::new(InMemorySessionStore::new()),
    };

    let llm = config
        .llm_url
        .as_ref()
        .map(|url| LlmService::new(url.clone(), config.llm_timeout()));

    // Kernel channels
    let (tx, rx) = mpsc::channel(100);
    let (outcome_tx, mut outcome_rx) = mpsc::channel(100);
    let shutdown = CancellationToken::new();

    let mut reactor = Reactor::new(rx, outcome_tx, controller, store);
    let reactor_shutdown = shutdown.clone();
    let reactor_task = tokio::spawn(async move {
        reactor.run(reactor_shutdown).await;
        reactor
    });

    let ctrl_c_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_shutdown.cancel();
        }
    });

    let session_id = SessionId::new();
    // What was actually said, for the model prompt
    let mut spoken: Vec<ConversationTurn> = Vec::new();

    println!("Describe the problem with your vehicle. Blank line to hang up, {} for a new issue.", RESET_COMMAND);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => match line? {
                Some(line) => line,
                None => break,
            },
        };

        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if line == RESET_COMMAND {
            tx.send(Event::ResetEpisode(session_id)).await?;
            println!("[new issue] What else is going on with the vehicle?");
            continue;
        }

        tx.send(Event::Input(InputEvent::text(session_id, line))).await?;
        let Some(outcome) = outcome_rx.recv().await else {
            break;
        };

        if let Some(decision) = &outcome.decision {
            tracing::debug!(
                "turn {} confidence {:.2} action {:?}",
                decision.turn_count,
                decision.confidence,
                decision.action
            );
        }

        spoken.push(ConversationTurn::user(line));
        let reply = match &llm {
            Some(llm) => match llm.generate(&outcome.mission, &spoken).await {
                Ok(reply) if !reply.is_empty() => reply,
                Ok(_) => outcome.mission.utterance(),
                Err(e) => {
                    tracing::warn!("LLM unavailable, using scripted line: {}", e);
                    outcome.mission.utterance()
                }
            },
            None => {
                println!("[mission] {}", outcome.mission.instruction());
                outcome.mission.utterance()
            }
        };
        println!("Jaimes: {}", reply);

        spoken.push(ConversationTurn::assistant(reply));
    }

    // Closing the channel lets the reactor drain and stop.
    tx.send(Event::EndSession(session_id)).await.ok();
    drop(tx);

    let reactor = reactor_task.await?;
    let snapshot = reactor.telemetry.snapshot();
    tracing::info!(
        "Session closed: {} turns analyzed, {} exits, avg {:.1} turns to exit",
        snapshot.turn_stats.analyzed,
        snapshot.exit_stats.total,
        snapshot.exit_stats.avg_turns_to_exit
    );

    Ok(())
}
