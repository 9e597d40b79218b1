use std::{
    collections::BTreeMap,
    io::Write,
    path::Path,
    process,
    sync::Arc,
};

use eventgate::{
    config::{self, Command, ReplayArgs},
    feed::{self, FeedWorker, ReplayStats},
    infra::{error::InfraError, telemetry},
    targetcache::{Params, TargetCache, TargetSnapshot, Targeter, TracingSink},
};
use eventgate_types::{FunctionId, TopicId};
use serde::Serialize;
use tokio::{
    fs::File,
    io::{AsyncBufRead, BufReader},
    sync::mpsc,
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

const STDIN_FEED: &str = "-";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &InfraError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), InfraError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    match cli_args.command {
        Command::Replay(args) => run_replay(settings, args).await,
    }
}

async fn run_replay(settings: config::Settings, args: ReplayArgs) -> Result<(), InfraError> {
    let targets = TargetCache::new(Arc::new(TracingSink));
    let (tx, rx) = mpsc::channel(settings.feed.channel_capacity.get());
    let worker = FeedWorker::new(targets.reactors()).spawn(rx);

    let replayed = match open_feed(&args.feed).await {
        Ok(reader) => feed::replay(reader, &tx).await.map_err(InfraError::from),
        Err(err) => Err(err),
    };
    drop(tx);
    let applied = worker.await?;
    let stats = replayed?;

    info!(
        feed = %args.feed.display(),
        sent = stats.sent,
        skipped = stats.skipped,
        applied,
        "Feed replayed"
    );

    let resolution = match args.resolve.as_deref() {
        Some([method, path]) => Some(resolve(&targets, method, path)),
        _ => None,
    };
    let topics = args
        .topics
        .iter()
        .map(|topic| {
            let topic = TopicId::from(topic.as_str());
            let subscribers = targets.subscribers_of_topic(&topic);
            (topic, subscribers)
        })
        .collect();

    let report = ReplayReport {
        stats,
        applied,
        snapshot: targets.snapshot(),
        resolution,
        topics,
    };
    print_json(&report)
}

async fn open_feed(path: &Path) -> Result<Box<dyn AsyncBufRead + Unpin + Send>, InfraError> {
    if path.as_os_str() == STDIN_FEED {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }

    let file = File::open(path).await?;
    Ok(Box::new(BufReader::new(file)))
}

fn resolve(targets: &TargetCache, method: &str, path: &str) -> Resolution {
    let (function_id, params) = match targets.http_backing_function(method, path) {
        Some((function_id, params)) => (Some(function_id), params),
        None => (None, Params::new()),
    };

    Resolution {
        method: method.to_string(),
        path: path.to_string(),
        function_id,
        params,
    }
}

fn print_json(report: &ReplayReport) -> Result<(), InfraError> {
    let rendered = serde_json::to_string_pretty(report)
        .map_err(|err| InfraError::output(format!("failed to encode report: {err}")))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    stats: ReplayStats,
    applied: usize,
    snapshot: TargetSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<Resolution>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    topics: BTreeMap<TopicId, Vec<FunctionId>>,
}

#[derive(Debug, Serialize)]
struct Resolution {
    method: String,
    path: String,
    function_id: Option<FunctionId>,
    params: Params,
}
