use integration_tests::harness::TestServer;
use pretty_assertions::assert_eq;
use std::net::IpAddr;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().unwrap()
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn new_viewer_gets_empty_init_then_live_events() {
    let srv = TestServer::start("basic");

    runtime().block_on(async {
        // Arrange
        let mut viewer = srv.connect_viewer().await;
        assert!(viewer.expect_init().await.is_empty());

        // Act
        srv.visit("/api/data", Some("203.0.113.5")).await;

        // Assert
        let event = viewer.expect_event().await;
        assert_eq!(event.raw.source_ip, ip("203.0.113.5"));
        assert_eq!(event.raw.method, "GET");
        assert_eq!(event.raw.path, "/api/data");
        assert_eq!(event.location.country_code, "FR");
        assert_eq!(event.location.city.as_deref(), Some("Paris"));
    });
}

#[test]
fn late_viewer_gets_capped_history_newest_first() {
    let srv = TestServer::start("basic");

    runtime().block_on(async {
        // Arrange: fixture history capacity is 5
        for n in 0..7 {
            srv.visit(&format!("/page/{n}"), Some("198.51.100.20")).await;
        }
        srv.wait_for_history(5).await;

        // Act
        let mut viewer = srv.connect_viewer().await;
        let history = viewer.expect_init().await;

        // Assert
        let paths: Vec<&str> = history.iter().map(|e| e.raw.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/page/6", "/page/5", "/page/4", "/page/3", "/page/2"]
        );
    });
}

#[test]
fn viewers_share_one_live_order() {
    let srv = TestServer::start("basic");

    runtime().block_on(async {
        // Arrange
        let mut early = srv.connect_viewer().await;
        early.expect_init().await;

        srv.visit("/one", Some("203.0.113.1")).await;
        srv.visit("/two", Some("198.51.100.2")).await;
        srv.wait_for_history(2).await;

        let mut late = srv.connect_viewer().await;
        let late_history = late.expect_init().await;

        // Act
        for path in ["/three", "/four", "/five"] {
            srv.visit(path, Some("203.0.113.3")).await;
        }

        // Assert
        let late_history: Vec<String> = late_history.into_iter().map(|e| e.raw.path).collect();
        assert_eq!(late_history, vec!["/two", "/one"]);

        let mut early_seen = Vec::new();
        for _ in 0..5 {
            early_seen.push(early.expect_event().await.raw.path);
        }
        assert_eq!(early_seen, vec!["/one", "/two", "/three", "/four", "/five"]);

        let mut late_seen = Vec::new();
        for _ in 0..3 {
            late_seen.push(late.expect_event().await.raw.path);
        }
        assert_eq!(late_seen, vec!["/three", "/four", "/five"]);
    });
}

#[test]
fn unlocatable_and_excluded_requests_never_reach_viewers() {
    let srv = TestServer::start("basic");

    runtime().block_on(async {
        // Arrange
        let mut viewer = srv.connect_viewer().await;
        viewer.expect_init().await;

        // Act
        srv.visit("/from-loopback", None).await;
        srv.visit("/from-private", Some("10.1.2.3")).await;
        srv.visit("/from-unknown", Some("192.0.2.44")).await;
        srv.visit("/bundle.js", Some("203.0.113.9")).await;
        srv.visit("/styles/site.css", Some("203.0.113.9")).await;
        srv.visit("/api/viewer-config", Some("203.0.113.9")).await;
        srv.visit("/marker", Some("203.0.113.9")).await;

        // Assert
        let first = viewer.expect_event().await;
        assert_eq!(first.raw.path, "/marker");
        assert_eq!(srv.health().await.history, 1);
    });
}

#[test]
fn viewer_disconnect_is_unregistered() {
    let srv = TestServer::start("basic");

    runtime().block_on(async {
        let mut viewer = srv.connect_viewer().await;
        viewer.expect_init().await;
        assert_eq!(srv.health().await.subscribers, 1);

        drop(viewer);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while srv.health().await.subscribers != 0 {
            assert!(std::time::Instant::now() < deadline, "viewer never unregistered");
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    });
}
