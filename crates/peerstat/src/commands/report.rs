//! The peer report: gather inputs, query, aggregate, write CSV.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use peerstat_config::Defaults;
use peerstat_core::{
    ApiKeyCredentials, CoreError, DeviceId, Lookback, MergePolicy, MetricsClient, PeerReport,
    ReportKind, ReportRequest, TlsMode, TransportConfig,
};

use crate::cli::{GroupBy, Merge, ReportArgs};
use crate::error::CliError;
use crate::output;
use crate::prompt::Prompter;

const LOOKBACK_PROMPT: &str = "How many days of lookback?";
const KEY_FILE_PROMPT: &str = "What is the name of your keyFile?";
const DEVICE_PROMPT: &str = "What is the device id?";

/// The three answers every report needs, with the key file already loaded.
#[derive(Debug)]
pub struct ReportInputs {
    pub lookback: Lookback,
    pub credentials: ApiKeyCredentials,
    pub device: DeviceId,
}

/// Take each input from its flag, prompting (in order) for the rest.
///
/// The key file is loaded as soon as it is named, so a bad one is reported
/// before the device id is asked for.
pub fn gather_inputs<R: BufRead, W: Write>(
    args: &ReportArgs,
    defaults: &Defaults,
    prompter: &mut Prompter<R, W>,
) -> Result<ReportInputs, CliError> {
    let lookback = match args.days {
        Some(days) => Lookback::from_days(days),
        None => Lookback::parse_lenient(&prompter.ask(LOOKBACK_PROMPT)?),
    };

    let key_file = match args.key_file {
        Some(ref name) => name.clone(),
        None => prompter.ask(KEY_FILE_PROMPT)?,
    };
    let key_path = defaults.resolve_key_file(&key_file);
    let credentials = ApiKeyCredentials::from_key_file(&key_path).map_err(CoreError::from)?;

    let device_answer = match args.device_id {
        Some(ref id) => id.clone(),
        None => prompter.ask(DEVICE_PROMPT)?,
    };
    let device = device_answer.parse::<DeviceId>()?;

    Ok(ReportInputs {
        lookback,
        credentials,
        device,
    })
}

/// Transport settings: config defaults with flag overrides.
fn transport(args: &ReportArgs, defaults: &Defaults) -> TransportConfig {
    let mut transport = defaults.transport();
    if args.insecure {
        transport.tls = TlsMode::DangerAcceptInvalid;
    } else if let Some(ref ca) = args.ca_cert {
        transport.tls = TlsMode::CustomCa(ca.clone());
    }
    if let Some(secs) = args.timeout {
        transport.timeout = Some(Duration::from_secs(secs));
    }
    transport
}

fn report_kind(args: &ReportArgs, defaults: &Defaults) -> ReportKind {
    match args.group_by {
        Some(GroupBy::Peer) => ReportKind::Peer,
        Some(GroupBy::PeerProtocol) => ReportKind::PeerProtocol,
        None => defaults.group_by,
    }
}

fn merge_policy(args: &ReportArgs, defaults: &Defaults) -> MergePolicy {
    match args.merge {
        Some(Merge::Overwrite) => MergePolicy::Overwrite,
        Some(Merge::Sum) => MergePolicy::Sum,
        None => defaults.merge,
    }
}

pub async fn handle(args: &ReportArgs, defaults: &Defaults) -> Result<(), CliError> {
    let inputs = gather_inputs(args, defaults, &mut Prompter::stdio())?;
    let credentials = &inputs.credentials;
    let client =
        MetricsClient::new(credentials, &transport(args, defaults)).map_err(CoreError::from)?;

    let request = ReportRequest::new(inputs.device, inputs.lookback)
        .with_kind(report_kind(args, defaults))
        .with_merge(merge_policy(args, defaults));
    debug!(?request, host = credentials.host(), "running peer report");

    let report = PeerReport::collect(&client, request).await?;
    println!("Metrics successfully queried");

    if args.preview {
        println!("{}", output::render_table(&report));
    }

    let dir = args
        .output_dir
        .clone()
        .or_else(|| defaults.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    report.write_to(&dir)?;
    println!("File {} successfully written", report.file_name());

    Ok(())
}
