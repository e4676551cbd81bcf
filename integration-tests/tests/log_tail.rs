use arcwatch_core::event::EventOrigin;
use integration_tests::harness::TestServer;
use pretty_assertions::assert_eq;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn append(path: &Path, text: &str) {
    let mut f = OpenOptions::new().append(true).open(path).unwrap();
    f.write_all(text.as_bytes()).unwrap();
}

#[test]
fn appended_log_lines_reach_viewers_and_old_lines_do_not() {
    // Arrange
    let dir = tempdir().unwrap();
    let log = dir.path().join("access.log");
    fs::write(
        &log,
        "203.0.113.1 - - [10/Oct/2023:13:55:35] \"GET /before-attach HTTP/1.1\" 200 10\n",
    )
    .unwrap();

    let srv = TestServer::start_tailing("basic", &log);

    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let mut viewer = srv.connect_viewer().await;
        viewer.expect_init().await;

        // Act
        append(
            &log,
            concat!(
                "garbled line from a half-written rotation\n",
                "203.0.113.5 - - [10/Oct/2023:13:55:36] \"GET /api/data HTTP/1.1\" 200 512\n",
                "198.51.100.8 - - [10/Oct/2023:13:55:37 +0000] \"POST /login HTTP/1.1\" 401 -\n",
            ),
        );

        // Assert
        let first = viewer.expect_event().await;
        assert_eq!(first.raw.origin, EventOrigin::Log);
        assert_eq!(first.raw.path, "/api/data");
        assert_eq!(first.raw.status_code, Some(200));
        assert_eq!(first.raw.response_size, Some(512));

        let second = viewer.expect_event().await;
        assert_eq!(second.raw.method, "POST");
        assert_eq!(second.raw.status_code, Some(401));
        assert_eq!(second.raw.response_size, None);
        assert_eq!(second.location.country_code, "JP");
    });
}
