mod common;

use async_trait::async_trait;
use common::{Client, PASSWORD, USERNAME};
use ferroftpd::{FtpListener, FtpRequest, ServerError, ServerInfo, SessionInfo};
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

#[tokio::test]
async fn test_login_navigation_and_quit() {
    let home = tempdir().unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::connect(t.addr).await;

    assert_eq!(client.code(&format!("USER {}", USERNAME)).await, 331);
    assert_eq!(client.code("PASS wrong").await, 530);
    // still unauthenticated
    assert_eq!(client.code("PWD").await, 530);

    assert_eq!(client.code(&format!("PASS {}", PASSWORD)).await, 230);

    let (code, text) = client.cmd("PWD").await;
    assert_eq!(code, 257);
    assert!(text.contains("\"/\""), "{}", text);

    assert_eq!(client.code("CWD /nope").await, 550);

    let (code, text) = client.cmd("QUIT").await;
    assert_eq!(code, 221);
    assert_eq!(text, "Goodbye.");
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_authorization_gate() {
    let home = tempdir().unwrap();
    fs::write(home.path().join("a.txt"), b"hello").unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::connect(t.addr).await;

    for line in ["PWD", "CWD /", "LIST", "RETR a.txt", "SIZE a.txt", "SITE WHO", "PASV", "XYZZY"] {
        let (code, text) = client.cmd(line).await;
        assert_eq!(code, 530, "{} -> {}", line, text);
    }

    assert_eq!(client.code("FEAT").await, 211);
    assert_eq!(client.code("AUTH TLS").await, 534);
    assert_eq!(client.code("PBSZ 0").await, 503);
    assert_eq!(client.code("PASS whatever").await, 503);

    assert_eq!(client.code("QUIT").await, 221);
}

#[tokio::test]
async fn test_unknown_commands_and_sub_commands() {
    let home = tempdir().unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::login(t.addr).await;

    assert_eq!(client.code("XYZZY").await, 502);
    assert_eq!(client.code("REIN").await, 502);
    assert_eq!(client.code("").await, 502);

    assert_eq!(client.code("SITE").await, 200);
    assert_eq!(client.code("SITE BOGUS").await, 504);
    assert_eq!(client.code("OPTS").await, 501);
    assert_eq!(client.code("OPTS FOO").await, 504);
    assert_eq!(client.code("OPTS UTF8 ON").await, 200);

    let (code, text) = client.cmd("site help").await;
    assert_eq!(code, 200);
    for sub in ["DESCUSER", "HELP", "STAT", "WHO", "ZONE"] {
        assert!(text.contains(sub), "{}", text);
    }

    let (code, text) = client.cmd("SITE DESCUSER").await;
    assert_eq!(code, 200);
    assert!(text.contains("username : admin"));
    assert!(text.contains("password : ******"));
    assert!(!text.contains(PASSWORD));

    assert_eq!(client.code("SITE STAT").await, 200);
    let (code, text) = client.cmd("SITE WHO").await;
    assert_eq!(code, 200);
    assert!(text.contains("Idle"), "{}", text);
    assert!(text.contains("admin"), "{}", text);
    assert_eq!(client.code("SITE ZONE").await, 200);
}

#[tokio::test]
async fn test_login_is_one_way() {
    let home = tempdir().unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::login(t.addr).await;

    assert_eq!(client.code(&format!("PASS {}", PASSWORD)).await, 202);
    assert_eq!(client.code("PASS wrong").await, 202);
    assert_eq!(client.code(&format!("USER {}", USERNAME)).await, 230);
    assert_eq!(client.code("USER intruder").await, 530);

    let (code, text) = client.cmd("SITE DESCUSER").await;
    assert_eq!(code, 200);
    assert!(text.contains("username : admin"));
}

#[tokio::test]
async fn test_size_and_mdtm() {
    let home = tempdir().unwrap();
    fs::write(home.path().join("a.txt"), b"hello").unwrap();
    fs::create_dir(home.path().join("dir")).unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::login(t.addr).await;

    assert_eq!(client.cmd("SIZE a.txt").await, (213, String::from("5")));
    assert_eq!(
        client.cmd("SIZE dir").await,
        (550, String::from("Not a plain file."))
    );
    assert_eq!(
        client.cmd("SIZE missing").await,
        (550, String::from("No such file or directory."))
    );

    let (code, stamp) = client.cmd("MDTM a.txt").await;
    assert_eq!(code, 213);
    assert_eq!(stamp.len(), 14);
    assert!(stamp.bytes().all(|b| b.is_ascii_digit()));

    let (code, text) = client.cmd("MFMT 20200102030405 a.txt").await;
    assert_eq!(code, 213);
    assert_eq!(text, "Modify=20200102030405; /a.txt");
    assert_eq!(
        client.cmd("MDTM a.txt").await,
        (213, String::from("20200102030405"))
    );
}

#[tokio::test]
async fn test_paths_stay_inside_home() {
    let home = tempdir().unwrap();
    fs::write(home.path().join("a.txt"), b"hello").unwrap();
    fs::create_dir_all(home.path().join("pub/docs")).unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::login(t.addr).await;

    assert_eq!(client.code("CWD pub\\docs").await, 250);
    assert_eq!(
        client.cmd("PWD").await,
        (257, String::from("\"/pub/docs\" is current directory."))
    );

    assert_eq!(client.cmd("SIZE ../../../../a.txt").await.0, 213);

    assert_eq!(client.code("CDUP").await, 250);
    assert_eq!(client.code("CWD ../../../..").await, 250);
    assert_eq!(
        client.cmd("PWD").await,
        (257, String::from("\"/\" is current directory."))
    );
    assert_eq!(client.code("CDUP").await, 250);
    assert_eq!(client.code("CWD a.txt").await, 550);
}

#[tokio::test]
async fn test_file_management() {
    let home = tempdir().unwrap();
    fs::write(home.path().join("old.txt"), b"data").unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::login(t.addr).await;

    assert_eq!(client.code("MKD new").await, 257);
    assert!(home.path().join("new").is_dir());
    assert_eq!(client.code("MKD new").await, 550);

    assert_eq!(client.code("RNTO whatever").await, 503);
    assert_eq!(client.code("RNFR missing").await, 550);
    assert_eq!(client.code("RNFR old.txt").await, 350);
    assert_eq!(client.code("RNTO new/moved.txt").await, 250);
    assert!(home.path().join("new/moved.txt").is_file());
    assert!(!home.path().join("old.txt").exists());

    assert_eq!(client.code("RMD new").await, 550);
    assert_eq!(client.code("DELE new").await, 550);
    assert_eq!(client.code("DELE new/moved.txt").await, 250);
    assert_eq!(client.code("RMD new").await, 250);
    assert!(!home.path().join("new").exists());
    assert_eq!(client.code("RMD /").await, 550);
}

#[tokio::test]
async fn test_parameters_and_informational() {
    let home = tempdir().unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::login(t.addr).await;

    assert_eq!(client.code("TYPE I").await, 200);
    assert_eq!(client.code("TYPE X").await, 504);
    assert_eq!(client.code("TYPE").await, 501);
    assert_eq!(client.code("MODE S").await, 200);
    assert_eq!(client.code("MODE B").await, 504);
    assert_eq!(client.code("STRU F").await, 200);
    assert_eq!(client.code("NOOP").await, 200);
    assert_eq!(client.code("ACCT x").await, 202);
    assert_eq!(client.code("ALLO 10").await, 202);

    assert_eq!(
        client.cmd("SYST").await,
        (215, String::from("UNIX Type: testftpd"))
    );

    let (code, text) = client.cmd("STAT").await;
    assert_eq!(code, 211);
    assert!(text.contains("Logged in as admin"), "{}", text);
    assert!(text.contains("TYPE: Binary"), "{}", text);

    let (code, text) = client.cmd("HELP").await;
    assert_eq!(code, 214);
    assert!(text.contains("RETR"));
    assert_eq!(client.code("HELP retr").await, 214);
    assert_eq!(client.code("HELP REIN").await, 502);
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl FtpListener for Recorder {
    async fn on_start(&self, server: &ServerInfo) {
        self.push(format!("start {}", server.name));
    }

    async fn on_connect(&self, session: &SessionInfo) {
        self.push(format!("connect {}", session.is_logged_in));
    }

    async fn before_command(&self, _session: &SessionInfo, request: &FtpRequest) {
        self.push(format!("before {}", request.command));
    }

    async fn after_command(&self, session: &SessionInfo, request: &FtpRequest, reply_code: u16) {
        self.push(format!(
            "after {} {} {}",
            request.command, reply_code, session.is_logged_in
        ));
    }

    async fn on_disconnect(&self, session: &SessionInfo) {
        self.push(format!(
            "disconnect {}",
            session.username.clone().unwrap_or_default()
        ));
    }

    async fn on_stop(&self, server: &ServerInfo) {
        self.push(format!("stop {}", server.name));
    }
}

async fn wait_for(recorder: &Recorder, event: &str) {
    for _ in 0..100 {
        if recorder.events().iter().any(|e| e == event) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{} never recorded: {:?}", event, recorder.events());
}

#[tokio::test]
async fn test_lifecycle_hooks() {
    let home = tempdir().unwrap();
    let server = common::test_server(home.path());
    let recorder = Arc::new(Recorder::default());
    server.add_listener("recorder", recorder.clone()).await;
    let t = common::spawn(server).await;

    let mut client = Client::login(t.addr).await;
    // gated and unknown commands never reach the hooks
    assert_eq!(client.code("XYZZY").await, 502);
    assert_eq!(client.code("NOOP").await, 200);
    assert_eq!(client.code("QUIT").await, 221);
    wait_for(&recorder, "disconnect admin").await;

    t.server.shutdown();
    assert!(matches!(
        t.handle.await.unwrap(),
        Err(ServerError::ServerClosed)
    ));

    assert_eq!(
        recorder.events(),
        vec![
            "start testftpd",
            "connect false",
            "before USER",
            "after USER 331 false",
            "before PASS",
            "after PASS 230 true",
            "before NOOP",
            "after NOOP 200 true",
            "before QUIT",
            "after QUIT 221 true",
            "disconnect admin",
            "stop testftpd",
        ]
    );
}

#[tokio::test]
async fn test_removed_listener_is_silent() {
    let home = tempdir().unwrap();
    let server = common::test_server(home.path());
    let recorder = Arc::new(Recorder::default());
    server.add_listener("recorder", recorder.clone()).await;
    assert!(server.remove_listener("recorder").await);
    assert!(!server.remove_listener("recorder").await);

    let t = common::spawn(server).await;
    let mut client = Client::connect(t.addr).await;
    assert_eq!(client.code("QUIT").await, 221);
    assert!(client.is_closed().await);

    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn test_shutdown_leaves_sessions_running() {
    let home = tempdir().unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::login(t.addr).await;

    t.server.shutdown();
    assert!(matches!(
        t.handle.await.unwrap(),
        Err(ServerError::ServerClosed)
    ));

    assert!(tokio::net::TcpStream::connect(t.addr).await.is_err());
    assert_eq!(client.code("NOOP").await, 200);
    assert_eq!(client.code("QUIT").await, 221);
}

#[tokio::test]
async fn test_oversized_line_is_rejected() {
    let home = tempdir().unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::login(t.addr).await;

    let long = format!("SIZE {}", "x".repeat(10_000));
    assert_eq!(
        client.cmd(&long).await,
        (500, String::from("Command line too long."))
    );
    // the remainder of the long line is skipped, not parsed as a command
    assert_eq!(client.code("NOOP").await, 200);
}

#[tokio::test]
async fn test_unterminated_last_line_is_dropped() {
    let home = tempdir().unwrap();
    let t = common::start(home.path()).await;
    let mut client = Client::login(t.addr).await;

    client.send_raw(b"NOOP").await;
    client.shutdown_write().await;
    assert!(client.is_closed().await);
}
