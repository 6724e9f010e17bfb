//! Unified log search and downloads.
//!
//! `log search --follow` re-runs the search every [`WATCH_INTERVAL`]
//! starting at the newest timestamp seen so far. Entries sharing that
//! timestamp come back on the next poll and are filtered out by the watch
//! baseline, so every entry is printed once. Older entries can never come
//! back and are forgotten after each poll.

use std::io::Write;

use chrono::{DateTime, Utc};
use nalej_proto::OrganizationId;
use nalej_proto::logging::{
    self, DownloadLogList, DownloadLogResponse, DownloadRequestId, LogEntry, LogResponse,
    SearchRequest,
};
use tracing::{debug, trace};

use super::Poll;
use crate::cli::{DownloadCommands, LogCommands, LogFilter};
use crate::client::Platform;
use crate::error::CliError;
use crate::output::{TableDisplay, or_dash, print_table, table, timestamp};
use crate::settings::Settings;
use crate::validate::{parse_time, require};
use crate::watch::{Source, WATCH_INTERVAL, Watched, watch};

impl TableDisplay for LogResponse {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["TIMESTAMP", "INSTANCE", "SERVICE", "MESSAGE"]);
        for e in &self.entries {
            let instance = if e.app_instance_name.is_empty() {
                &e.app_instance_id
            } else {
                &e.app_instance_name
            };
            t.add_row(vec![
                e.timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
                or_dash(instance),
                or_dash(&e.service_name),
                e.msg.clone(),
            ]);
        }
        print_table(writer, &t)
    }
}

impl Watched for LogEntry {
    type Key = (DateTime<Utc>, String, String, String);

    fn key(&self) -> Self::Key {
        (
            self.timestamp,
            self.app_instance_id.clone(),
            self.service_name.clone(),
            self.msg.clone(),
        )
    }

    fn changed(&self, _previous: &Self) -> bool {
        false
    }
}

fn downloads_table<W: Write>(
    writer: &mut W,
    requests: &[DownloadLogResponse],
) -> Result<(), CliError> {
    let mut t = table(&["REQUEST", "STATE", "EXPIRES", "URL", "INFO"]);
    for r in requests {
        t.add_row(vec![
            r.request_id.clone(),
            r.state.clone(),
            timestamp(r.expiration),
            or_dash(&r.url),
            or_dash(&r.info),
        ]);
    }
    print_table(writer, &t)
}

impl TableDisplay for DownloadLogResponse {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        downloads_table(writer, std::slice::from_ref(self))
    }
}

impl TableDisplay for DownloadLogList {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        downloads_table(writer, &self.requests)
    }
}

impl Watched for DownloadLogResponse {
    type Key = String;

    fn key(&self) -> String {
        self.request_id.clone()
    }

    fn changed(&self, previous: &Self) -> bool {
        self.state != previous.state || self.url != previous.url || self.info != previous.info
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validate the filters and build the search request.
fn search_request(organization_id: String, filter: &LogFilter) -> Result<SearchRequest, CliError> {
    let app_instance_id = non_empty(filter.instance_id.as_ref());
    let service_group_instance_id = non_empty(filter.sg_instance_id.as_ref());
    let service_id = non_empty(filter.service_id.as_ref());
    if service_group_instance_id.is_some() && app_instance_id.is_none() {
        return Err(CliError::usage("--sg-instance-id requires --instance-id"));
    }
    if service_id.is_some() && service_group_instance_id.is_none() {
        return Err(CliError::usage("--service-id requires --sg-instance-id"));
    }

    let from = non_empty(filter.from.as_ref())
        .map(|v| parse_time("--from", &v))
        .transpose()?;
    let to = non_empty(filter.to.as_ref())
        .map(|v| parse_time("--to", &v))
        .transpose()?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(CliError::usage("--from must not be later than --to"));
        }
    }

    Ok(SearchRequest {
        organization_id,
        app_instance_id,
        service_group_instance_id,
        service_id,
        msg_query_filter: non_empty(filter.message.as_ref()),
        from,
        to,
        descending: filter.desc,
    })
}

/// Search re-issued by `--follow`, moving `from` forward.
struct Follow<'a, P> {
    platform: &'a mut P,
    request: SearchRequest,
}

impl<P: Platform> Source for Follow<'_, P> {
    type Item = LogEntry;

    async fn fetch(&mut self) -> Result<Vec<LogEntry>, CliError> {
        let response = self.platform.call(&logging::SEARCH, &self.request).await?;
        if let Some(newest) = response.entries.iter().map(|e| e.timestamp).max() {
            trace!(%newest, "advancing follow window");
            self.request.from = Some(newest);
        }
        Ok(response.entries)
    }

    fn keeps(&self, key: &<LogEntry as Watched>::Key) -> bool {
        self.request.from.is_none_or(|from| key.0 >= from)
    }
}

/// Handler for the log command.
pub struct LogCommand<'a> {
    settings: &'a Settings,
}

impl<'a> LogCommand<'a> {
    /// Creates a new log command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes a log subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails. `--follow` and
    /// `--watch` return only when a poll fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &LogCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            LogCommands::Search {
                filter,
                follow: false,
            } => {
                let request = search_request(organization_id, filter)?;
                let response = platform.call(&logging::SEARCH, &request).await?;
                format.write(out, &response)
            }
            LogCommands::Search {
                filter,
                follow: true,
            } => {
                if filter.desc {
                    return Err(CliError::usage("--desc cannot be used with --follow"));
                }
                if filter.to.as_deref().is_some_and(|v| !v.trim().is_empty()) {
                    return Err(CliError::usage("--to cannot be used with --follow"));
                }
                let request = search_request(organization_id.clone(), filter)?;
                debug!(from = ?request.from, "following logs");
                let mut source = Follow { platform, request };
                watch(&mut source, WATCH_INTERVAL, out, |w, entries| {
                    format.write(
                        w,
                        &LogResponse {
                            organization_id: organization_id.clone(),
                            from: None,
                            to: None,
                            entries,
                        },
                    )
                })
                .await
            }
            LogCommands::Download { command } => {
                self.download(platform, out, organization_id, command).await
            }
        }
    }

    async fn download<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        organization_id: String,
        command: &DownloadCommands,
    ) -> Result<(), CliError> {
        let format = &self.settings.output;

        match command {
            DownloadCommands::Request { filter } => {
                let request = search_request(organization_id, filter)?;
                let response = platform.call(&logging::DOWNLOAD_REQUEST, &request).await?;
                format.write(out, &response)
            }
            DownloadCommands::List { watch: false } => {
                let list = platform
                    .call(&logging::DOWNLOAD_LIST, &OrganizationId::new(organization_id))
                    .await?;
                format.write(out, &list)
            }
            DownloadCommands::List { watch: true } => {
                let mut source = Poll::new(
                    platform,
                    &logging::DOWNLOAD_LIST,
                    OrganizationId::new(organization_id),
                    |list: DownloadLogList| list.requests,
                );
                watch(&mut source, WATCH_INTERVAL, out, |w, requests| {
                    format.write(w, &DownloadLogList { requests })
                })
                .await
            }
            DownloadCommands::Check { request_id } => {
                let request = DownloadRequestId {
                    organization_id,
                    request_id: require("request ID", request_id)?.to_string(),
                };
                let response = platform.call(&logging::DOWNLOAD_CHECK, &request).await?;
                format.write(out, &response)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FakePlatform;
    use serde_json::json;
    use tempfile::TempDir;

    async fn run(
        platform: &mut FakePlatform,
        command: LogCommands,
    ) -> (Result<(), CliError>, String) {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut out = Vec::new();
        let result = LogCommand::new(&settings)
            .execute(platform, &mut out, &command)
            .await;
        (result, String::from_utf8(out).unwrap())
    }

    fn entry(ts: &str, msg: &str) -> serde_json::Value {
        json!({
            "timestamp": ts,
            "appInstanceId": "i1",
            "appInstanceName": "blog",
            "serviceName": "nginx",
            "msg": msg
        })
    }

    fn entries(list: &[serde_json::Value]) -> serde_json::Value {
        json!({"organizationId": "org-1", "entries": list})
    }

    #[tokio::test]
    async fn search_builds_request_from_filters() {
        let mut platform = FakePlatform::new().respond(entries(&[entry(
            "2020-01-31T12:00:01Z",
            "GET /",
        )]));
        let filter = LogFilter {
            instance_id: Some("i1".into()),
            message: Some("GET".into()),
            from: Some("2020-01-31 12:00".into()),
            desc: true,
            ..LogFilter::default()
        };
        let (result, out) = run(
            &mut platform,
            LogCommands::Search {
                filter,
                follow: false,
            },
        )
        .await;
        result.unwrap();
        assert_eq!(
            platform.single_params(),
            &json!({
                "organizationId": "org-1",
                "appInstanceId": "i1",
                "msgQueryFilter": "GET",
                "from": "2020-01-31T12:00:00Z",
                "descending": true
            })
        );
        assert!(out.contains("2020-01-31 12:00:01.000"));
        assert!(out.contains("GET /"));
        assert!(out.contains("blog"));
    }

    #[tokio::test]
    async fn search_rejects_bad_ranges() {
        for filter in [
            LogFilter {
                from: Some("yesterday".into()),
                ..LogFilter::default()
            },
            LogFilter {
                from: Some("2020-02-01".into()),
                to: Some("2020-01-01".into()),
                ..LogFilter::default()
            },
            LogFilter {
                sg_instance_id: Some("g1".into()),
                ..LogFilter::default()
            },
        ] {
            let mut platform = FakePlatform::new();
            let (result, _) = run(
                &mut platform,
                LogCommands::Search {
                    filter,
                    follow: false,
                },
            )
            .await;
            assert!(matches!(result, Err(CliError::Usage(_))));
            assert!(platform.calls().is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn follow_prints_each_entry_once_and_advances() {
        let mut platform = FakePlatform::new()
            .respond(entries(&[
                entry("2020-01-31T12:00:00Z", "one"),
                entry("2020-01-31T12:00:05Z", "two"),
            ]))
            .respond(entries(&[
                entry("2020-01-31T12:00:05Z", "two"),
                entry("2020-01-31T12:00:09Z", "three"),
            ]))
            .respond(entries(&[]));
        let (result, out) = run(
            &mut platform,
            LogCommands::Search {
                filter: LogFilter::default(),
                follow: true,
            },
        )
        .await;

        assert!(matches!(result, Err(CliError::Connection(_))));
        let calls = platform.calls();
        assert!(calls[0].params.get("from").is_none());
        assert_eq!(calls[1].params["from"], "2020-01-31T12:00:05Z");
        assert_eq!(calls[2].params["from"], "2020-01-31T12:00:09Z");
        assert_eq!(calls[3].params["from"], "2020-01-31T12:00:09Z");
        assert_eq!(out.matches("two").count(), 1);
        assert_eq!(out.matches("three").count(), 1);
    }

    #[tokio::test]
    async fn follow_forgets_entries_older_than_the_window() {
        let mut platform = FakePlatform::new().respond(entries(&[
            entry("2020-01-31T12:00:00Z", "one"),
            entry("2020-01-31T12:00:05Z", "two"),
        ]));
        let mut follow = Follow {
            platform: &mut platform,
            request: SearchRequest::default(),
        };
        let fetched = follow.fetch().await.unwrap();
        assert!(!follow.keeps(&fetched[0].key()));
        assert!(follow.keeps(&fetched[1].key()));
    }

    #[tokio::test]
    async fn follow_rejects_descending() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            LogCommands::Search {
                filter: LogFilter {
                    desc: true,
                    ..LogFilter::default()
                },
                follow: true,
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(platform.calls().is_empty());
    }

    fn download(id: &str, state: &str, url: &str) -> serde_json::Value {
        json!({
            "organizationId": "org-1",
            "requestId": id,
            "state": state,
            "url": url
        })
    }

    #[tokio::test(start_paused = true)]
    async fn download_list_watch_reports_state_changes() {
        let mut platform = FakePlatform::new()
            .respond(json!({"requests": [download("r1", "PENDING", "")]}))
            .respond(json!({"requests": [download("r1", "READY", "https://dl/r1")]}));
        let (result, out) = run(
            &mut platform,
            LogCommands::Download {
                command: DownloadCommands::List { watch: true },
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Connection(_))));
        let (initial, update) = out.split_once("\n\n").unwrap();
        assert!(initial.contains("PENDING"));
        assert!(update.contains("READY"));
        assert!(update.contains("https://dl/r1"));
    }

    #[tokio::test]
    async fn download_check_requires_id() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            LogCommands::Download {
                command: DownloadCommands::Check {
                    request_id: String::new(),
                },
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(platform.calls().is_empty());

        let mut platform = FakePlatform::new().respond(download("r1", "READY", "https://dl/r1"));
        let (result, out) = run(
            &mut platform,
            LogCommands::Download {
                command: DownloadCommands::Check {
                    request_id: "r1".into(),
                },
            },
        )
        .await;
        result.unwrap();
        assert_eq!(platform.methods(), vec!["UnifiedLogging.DownloadCheck"]);
        assert!(out.contains("READY"));
    }

    #[tokio::test]
    async fn download_request_uses_same_filters() {
        let mut platform = FakePlatform::new().respond(download("r2", "QUEUED", ""));
        let (result, _) = run(
            &mut platform,
            LogCommands::Download {
                command: DownloadCommands::Request {
                    filter: LogFilter {
                        instance_id: Some("i1".into()),
                        ..LogFilter::default()
                    },
                },
            },
        )
        .await;
        result.unwrap();
        assert_eq!(platform.methods(), vec!["UnifiedLogging.DownloadRequest"]);
        assert_eq!(platform.single_params()["appInstanceId"], "i1");
    }
}
