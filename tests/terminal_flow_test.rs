//! End-to-end runs of the terminal dialog against a mock registration
//! server.

use std::io::Write;
use std::sync::{Arc, Mutex};

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use regwizard_lib::bootstrap::wire_wizard;
use regwizard_lib::terminal::{run_dialog, ConsoleView, TerminalDialogHost};
use rw_core::config::WizardConfig;
use rw_core::DialogId;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct Session {
    view_output: SharedBuffer,
    prompts: Vec<u8>,
    host: Arc<TerminalDialogHost>,
    open_dialogs: usize,
    dialog_id: DialogId,
}

async fn run_session(server: &ServerGuard, input: &'static str) -> Session {
    let config = WizardConfig {
        api_base_url: server.url(),
        timeout_secs: 5,
        ..WizardConfig::default()
    };
    let view_output = SharedBuffer::default();
    let host = Arc::new(TerminalDialogHost::new(config.password_form.clone()));
    let wizard = wire_wizard(
        &config,
        Arc::new(ConsoleView::new(view_output.clone())),
        host.clone(),
    )
    .unwrap();

    let dialog_id = DialogId::new();
    let mut prompts = Vec::new();
    run_dialog(&wizard, &host, &dialog_id, input.as_bytes(), &mut prompts)
        .await
        .unwrap();

    Session {
        view_output,
        prompts,
        host,
        open_dialogs: wizard.open_dialogs().await,
        dialog_id,
    }
}

#[tokio::test]
async fn registers_a_new_account() {
    let mut server = Server::new_async().await;
    let prepare = server
        .mock("GET", "/api/v1.0/registration/prepare")
        .with_status(200)
        .with_body(r#"{"token":"t1","registration_key":"k1"}"#)
        .create_async()
        .await;
    let choose_username = server
        .mock("POST", "/api/v1.0/registration/choose_username")
        .match_body(Matcher::Json(json!({
            "username": "alice",
            "registration_key": "k1",
            "token": "t1",
        })))
        .with_status(200)
        .with_body(
            r#"{"token":"t2","registration_key":"k2","username_message":"username_available"}"#,
        )
        .create_async()
        .await;
    let set_password = server
        .mock("POST", "/api/v1.0/registration/set_password")
        .match_body(Matcher::Json(json!({
            "password": "Secret123",
            "registration_key": "k2",
            "token": "t2",
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let session = run_session(&server, "alice\nSecret123\nSecret123\n\n").await;

    prepare.assert_async().await;
    choose_username.assert_async().await;
    set_password.assert_async().await;

    let view = session.view_output.contents();
    assert!(view.contains("Username (ok)"), "view output: {view}");
    assert!(view.contains("Password (ok)"), "view output: {view}");
    assert!(view.contains("Confirm password (warning)"), "view output: {view}");
    assert!(view.ends_with("[success] Registration successful\n"), "view output: {view}");

    let prompts = String::from_utf8(session.prompts).unwrap();
    assert_eq!(
        prompts,
        "Username: Password: Confirm password: Press Enter to close "
    );
    assert!(session.host.password_form_shown(&session.dialog_id));
    assert!(session.host.is_closed(&session.dialog_id));
    assert_eq!(session.open_dialogs, 0);
}

#[tokio::test]
async fn invalid_username_never_reaches_the_server() {
    let mut server = Server::new_async().await;
    let _prepare = server
        .mock("GET", "/api/v1.0/registration/prepare")
        .with_status(200)
        .with_body(r#"{"token":"t1","registration_key":"k1"}"#)
        .create_async()
        .await;
    let choose_username = server
        .mock("POST", "/api/v1.0/registration/choose_username")
        .expect(0)
        .create_async()
        .await;

    let session = run_session(&server, "ab\n").await;

    choose_username.assert_async().await;
    assert_eq!(
        session.view_output.contents(),
        "Username (processing)\nUsername (error) Username invalid\n"
    );
    assert!(session.host.is_closed(&session.dialog_id));
    assert_eq!(session.open_dialogs, 0);
}

#[tokio::test]
async fn token_failure_ends_the_dialog() {
    let mut server = Server::new_async().await;
    let _prepare = server
        .mock("GET", "/api/v1.0/registration/prepare")
        .with_status(500)
        .create_async()
        .await;

    let session = run_session(&server, "alice\n").await;

    assert_eq!(
        session.view_output.contents(),
        "The form is disabled.\n[danger] Failed to get a token for registration.\n"
    );
    assert!(session.prompts.is_empty());
    assert_eq!(session.open_dialogs, 0);
}

#[tokio::test]
async fn taken_username_can_be_retried() {
    let mut server = Server::new_async().await;
    let _prepare = server
        .mock("GET", "/api/v1.0/registration/prepare")
        .with_status(200)
        .with_body(r#"{"token":"t1","registration_key":"k1"}"#)
        .create_async()
        .await;
    let taken = server
        .mock("POST", "/api/v1.0/registration/choose_username")
        .match_body(Matcher::PartialJson(json!({"username": "alice", "token": "t1"})))
        .with_status(200)
        .with_body(r#"{"token":"t2","registration_key":"k2","username_message":"taken"}"#)
        .create_async()
        .await;
    let available = server
        .mock("POST", "/api/v1.0/registration/choose_username")
        .match_body(Matcher::PartialJson(json!({"username": "alice2", "token": "t2"})))
        .with_status(200)
        .with_body(
            r#"{"token":"t3","registration_key":"k3","username_message":"username_available"}"#,
        )
        .create_async()
        .await;

    let session = run_session(&server, "alice\nalice2\n").await;

    taken.assert_async().await;
    available.assert_async().await;
    let view = session.view_output.contents();
    assert!(view.contains("Username (error) Username invalid: taken"), "view output: {view}");
    assert!(view.contains("Username (ok)"), "view output: {view}");
    let prompts = String::from_utf8(session.prompts).unwrap();
    assert_eq!(prompts, "Username: Username: Password: \n");
}
