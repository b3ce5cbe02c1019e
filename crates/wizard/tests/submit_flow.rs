//! Drives the wizard end to end against a live API server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use tempfile::TempDir;

use irs_api::config::ServerConfig;
use irs_api::router::build_app_router;
use irs_api::state::AppState;
use irs_core::schema::WizardStep;
use irs_core::ticket::is_ticket_id;
use irs_db::Store;
use irs_wizard::controller::{Advance, NotificationLevel, Phase, StepController};
use irs_wizard::draft::{DraftSlot, FileDraftSlot};
use irs_wizard::error::{SubmitError, WizardError};
use irs_wizard::media::{AudioRecording, CapturedFile};
use irs_wizard::submit::{HttpIssueClient, IssueSubmitter, SubmissionPayload, SubmitReceipt};

struct TestServer {
    base_url: String,
    store: Arc<Store>,
    _upload_dir: TempDir,
}

async fn spawn_server() -> TestServer {
    let upload_dir = TempDir::new().unwrap();
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: None,
        upload_dir: upload_dir.path().to_path_buf(),
        max_body_bytes: 64 * 1024 * 1024,
    };
    let store = Arc::new(Store::new());
    let state = AppState {
        store: Arc::clone(&store),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        store,
        _upload_dir: upload_dir,
    }
}

/// Fill every step and land on the review step with terms accepted.
fn completed_wizard() -> StepController {
    let mut wizard = StepController::new();

    let form = wizard.form_mut();
    form.title = "Scanner drops connection".into();
    form.description = "Bluetooth scanner disconnects every few minutes.".into();
    form.platform = "android".into();
    form.product_category = "peripherals".into();
    form.severity = "medium".into();
    assert_eq!(wizard.advance(), Advance::Moved(WizardStep::Reproducibility));

    let form = wizard.form_mut();
    form.frequency = "often".into();
    form.reproducible = Some(true);
    form.steps_to_reproduce = "Pair scanner, wait five minutes.".into();
    form.actual_behavior = "Connection lost".into();
    assert_eq!(wizard.advance(), Advance::Moved(WizardStep::Environment));

    let form = wizard.form_mut();
    form.hardware_version = "BT-9 rev 2".into();
    form.software_version = "app 3.4.1".into();
    form.reporter = "warehouse-7".into();
    assert_eq!(wizard.advance(), Advance::Moved(WizardStep::Media));
    assert_eq!(wizard.advance(), Advance::Moved(WizardStep::Review));

    assert_eq!(wizard.advance(), Advance::Blocked);
    assert!(wizard.field_errors().contains("terms_accepted"));
    wizard.set_terms_accepted(true);
    assert_eq!(wizard.advance(), Advance::ReadyToSubmit);
    wizard.take_notifications();
    wizard
}

#[tokio::test]
async fn wizard_submits_issue_with_media_and_receives_ticket() {
    let server = spawn_server().await;
    let client = HttpIssueClient::new(&server.base_url);

    let mut wizard = completed_wizard();
    assert!(wizard.add_photos(vec![CapturedFile::new(
        "shelf.jpg",
        "image/jpeg",
        b"jpeg-bytes".to_vec()
    )]));
    assert!(wizard.set_audio(AudioRecording {
        file: CapturedFile::new("note.webm", "audio/webm", b"opus".to_vec()),
        duration: Duration::from_secs(4),
    }));
    assert!(wizard.add_files(vec![CapturedFile::new(
        "pairing.log",
        "text/plain",
        b"lost link".to_vec()
    )]));

    let ticket = wizard.submit(&client).await.unwrap();
    assert!(is_ticket_id(&ticket), "unexpected ticket {ticket}");
    assert_eq!(
        wizard.phase(),
        &Phase::Submitted {
            ticket_id: ticket.clone()
        }
    );
    assert_eq!(wizard.advance(), Advance::Locked);

    let notes = wizard.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Info);
    assert!(notes[0].message.contains(&ticket));

    let counts = server.store.counts().await;
    assert_eq!(counts.issues, 1);
    assert_eq!(counts.media, 3);

    assert_matches!(wizard.begin_submission(), Err(WizardError::AlreadySubmitted));
}

#[tokio::test]
async fn http_client_surfaces_server_validation_message() {
    let server = spawn_server().await;
    let client = HttpIssueClient::new(&server.base_url);

    let payload = SubmissionPayload {
        issue_data: r#"{"title":""}"#.to_string(),
        files: Vec::new(),
    };
    let err = client.submit(payload).await.unwrap_err();
    assert_matches!(
        err,
        SubmitError::Rejected { status: 400, ref message } if message.contains("title")
    );
    assert_eq!(server.store.counts().await.issues, 0);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpIssueClient::new(format!("http://{addr}"));
    let payload = SubmissionPayload {
        issue_data: "{}".to_string(),
        files: Vec::new(),
    };
    assert_matches!(client.submit(payload).await, Err(SubmitError::Transport(_)));
}

/// Fails the first `failures` submissions, then succeeds.
struct FlakySubmitter {
    failures: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl IssueSubmitter for FlakySubmitter {
    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmitReceipt, SubmitError> {
        assert!(payload.issue_data.contains("Scanner drops connection"));
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(SubmitError::Transport("connection reset".into()));
        }
        Ok(SubmitReceipt {
            ticket_id: "IRS-4321".into(),
            message: None,
            issue: serde_json::Value::Null,
        })
    }
}

#[tokio::test]
async fn failed_submission_returns_to_review_and_can_be_retried() {
    let submitter = FlakySubmitter {
        failures: 1,
        calls: AtomicUsize::new(0),
    };
    let mut wizard = completed_wizard();
    assert!(wizard.add_photos(vec![CapturedFile::new("a.jpg", "image/jpeg", vec![1])]));

    let err = wizard.submit(&submitter).await.unwrap_err();
    assert_matches!(err, WizardError::Submit(SubmitError::Transport(_)));
    assert_eq!(wizard.phase(), &Phase::Editing);
    assert_eq!(wizard.step(), WizardStep::Review);
    assert_eq!(wizard.form().title, "Scanner drops connection");
    assert_eq!(wizard.media().photos().len(), 1);

    let notes = wizard.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert!(notes[0].message.contains("connection reset"));

    assert_eq!(wizard.submit(&submitter).await.unwrap(), "IRS-4321");
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn second_submission_while_in_flight_is_rejected() {
    let mut wizard = completed_wizard();
    let _payload = wizard.begin_submission().unwrap();
    assert!(wizard.is_submitting());

    assert_matches!(wizard.begin_submission(), Err(WizardError::AlreadySubmitting));
    assert_eq!(wizard.retreat(), WizardStep::Review);
}

#[test]
fn draft_round_trips_through_file_slot() {
    let dir = TempDir::new().unwrap();
    let slot = FileDraftSlot::new(dir.path().join("draft.json"));

    let mut wizard = completed_wizard();
    wizard.save_draft(&slot);
    assert_eq!(wizard.step(), WizardStep::Review);
    assert_eq!(wizard.take_notifications()[0].title, "Draft saved");

    let mut restored = StepController::new();
    restored.restore_draft(slot.load().unwrap().unwrap());
    assert_eq!(restored.form(), wizard.form());
    assert!(restored.terms_accepted());
    assert_eq!(restored.step(), WizardStep::IssueDetails);
}

#[test]
fn draft_save_reports_success_even_when_write_fails() {
    let dir = TempDir::new().unwrap();
    let slot = FileDraftSlot::new(dir.path().join("missing-dir").join("draft.json"));

    let mut wizard = StepController::new();
    wizard.form_mut().title = "half done".into();
    wizard.save_draft(&slot);

    let notes = wizard.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Info);
    assert!(slot.load().unwrap().is_none());
}
