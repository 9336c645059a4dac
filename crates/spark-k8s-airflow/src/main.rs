use std::path::PathBuf;
use std::process::ExitCode;

use clap::{crate_description, crate_version, Args, Parser, Subcommand};
use crd::constants;
use spark_k8s_airflow::{
    EnvConnectionStore, FileConnectionStore, LayeredConnectionStore, SparkKubernetesOperator,
    SparkKubernetesSensor, TaskContext,
};

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
    pub const TARGET_PLATFORM: Option<&str> = option_env!("TARGET");
}

/// Exit code of `poke` while the application hasn't finished.
const EXIT_NOT_DONE: u8 = 2;

#[derive(Subcommand, Debug, PartialEq, Eq)]
#[command(long_about = "")]
pub enum Command {
    /// Create a SparkApplication and print the created object
    Submit(SubmitParams),
    /// Check the state of a SparkApplication once
    Poke(PokeParams),
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct SubmitParams {
    /// The application descriptor, inline or as a path to a .yaml, .yml or .json file
    #[arg(long, short = 'f')]
    pub application_file: String,
    #[command(flatten)]
    pub task: TaskParams,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct PokeParams {
    /// Name of the SparkApplication object
    #[arg(long, short = 'a')]
    pub application_name: String,
    #[command(flatten)]
    pub task: TaskParams,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct TaskParams {
    /// Namespace of the SparkApplication, instead of the one of the connection
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,
    /// The connection to the Kubernetes cluster
    #[arg(long, default_value = constants::DEFAULT_CONN_ID)]
    pub conn_id: String,
}

#[derive(Parser)]
#[clap(about, author)]
struct Opts {
    #[clap(subcommand)]
    cmd: Command,
    /// Provides the path to a connections file
    #[arg(long, value_name = "FILE", default_value = "", env = constants::CONNECTIONS_FILE_ENV, global = true)]
    connections_file: common::ConfigFilePath,
    /// Directories searched for application files given by a relative path
    #[arg(long, global = true)]
    template_searchpath: Vec<PathBuf>,
    /// Tracing log collector system
    #[arg(long, env, default_value_t, value_enum, global = true)]
    tracing_target: common::logging::TracingTarget,
    /// Log level
    #[arg(long, default_value = "INFO", global = true)]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let opts = Opts::parse();
    common::logging::initialize_logging(
        constants::APP_LOG_ENV,
        constants::APP_NAME,
        opts.tracing_target.clone(),
        opts.log_level.as_str(),
    );
    common::utils::print_startup_string(
        crate_description!(),
        crate_version!(),
        built_info::GIT_VERSION,
        built_info::TARGET_PLATFORM.unwrap_or("unknown target platform"),
        built_info::BUILT_TIME_UTC,
        built_info::RUSTC_VERSION,
    );

    let tracing_target = opts.tracing_target.clone();
    let result = execute(opts).await;

    common::utils::print_shutdown_string();
    common::logging::shutdown_logging(&tracing_target);
    result
}

async fn execute(opts: Opts) -> anyhow::Result<ExitCode> {
    let context = task_context(&opts)?;
    run(opts.cmd, &context).await
}

async fn run(cmd: Command, context: &TaskContext) -> anyhow::Result<ExitCode> {
    match cmd {
        Command::Submit(SubmitParams { application_file, task }) => {
            let operator = SparkKubernetesOperator::new(application_file)
                .namespace(task.namespace)
                .conn_id(task.conn_id);
            let response = operator.execute(context).await?;
            println!("---");
            println!("{}", serde_yaml::to_string(&response)?);
            Ok(ExitCode::SUCCESS)
        }

        Command::Poke(PokeParams { application_name, task }) => {
            let sensor = SparkKubernetesSensor::new(application_name)
                .namespace(task.namespace)
                .conn_id(task.conn_id);
            if sensor.poke(context).await? {
                println!("done");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("not done");
                Ok(ExitCode::from(EXIT_NOT_DONE))
            }
        }
    }
}

/// Connections come from the environment first, then from the connections file if there is one.
fn task_context(opts: &Opts) -> anyhow::Result<TaskContext> {
    let mut connections = LayeredConnectionStore::new().with(EnvConnectionStore::default());
    if let Some(file) = opts
        .connections_file
        .find(&constants::CONNECTIONS_FILE_SEARCH_PATHS)?
    {
        tracing::debug!("reading connections from [{}]", file.display());
        connections = connections.with(FileConnectionStore::new(file));
    }

    let mut context = TaskContext::new(connections);
    context.template_searchpath = opts.template_searchpath.clone();
    Ok(context)
}
