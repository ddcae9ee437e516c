#[cfg(test)]
mod tests {
    use crate::Imposter;
    use std::path::Path;
    use std::sync::{Mutex, OnceLock};
    use std::time::{Duration, Instant};
    use ureq::Error as UreqError;

    const TEST_PORT: u16 = 18080;

    static SERVER: OnceLock<Mutex<std::thread::JoinHandle<()>>> = OnceLock::new();

    fn run_test_server() -> &'static Mutex<std::thread::JoinHandle<()>> {
        SERVER.get_or_init(|| {
            let handle = std::thread::spawn(|| {
                let config_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/tests/configs");
                std::env::set_var("IMPOSTER_PORT", TEST_PORT.to_string());
                let imposter = Imposter::from_paths(&[config_dir.to_string_lossy().to_string()])
                    .expect("failed to load end-to-end test config");
                imposter.run().expect("test server exited with an error");
            });
            std::thread::sleep(Duration::from_millis(500));
            Mutex::new(handle)
        })
    }

    fn url(path: &str) -> String {
        format!("http://127.0.0.1:{TEST_PORT}{path}")
    }

    fn expect_status(err: UreqError, expected: u16) {
        match err {
            UreqError::StatusCode(code) => assert_eq!(code, expected),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn path_and_query_match_selects_the_more_specific_resource() {
        run_test_server();

        let mut verbose = ureq::get(&url("/api/items/42?verbose=true")).call().unwrap();
        assert_eq!(verbose.body_mut().read_to_string().unwrap(), "item-42");

        let mut brief = ureq::get(&url("/api/items/42")).call().unwrap();
        assert_eq!(brief.body_mut().read_to_string().unwrap(), "item-42-brief");
    }

    #[test]
    fn json_path_body_match_accepts_gift_orders() {
        run_test_server();

        let mut response = ureq::post(&url("/api/orders"))
            .header("content-type", "application/json")
            .send(br#"{"kind":"gift"}"#.as_slice())
            .unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(
            response.body_mut().read_to_string().unwrap(),
            "gift-order-accepted"
        );

        let err = ureq::post(&url("/api/orders"))
            .header("content-type", "application/json")
            .send(br#"{"kind":"standard"}"#.as_slice())
            .expect_err("a non-gift order has no matching resource");
        expect_status(err, 404);
    }

    #[test]
    fn interceptor_short_circuits_before_the_resource_runs() {
        run_test_server();

        let err = ureq::get(&url("/api/intercepted"))
            .call()
            .expect_err("expected the interceptor to short-circuit with 401");
        expect_status(err, 401);
    }

    #[test]
    fn delay_spec_holds_the_response_for_at_least_the_configured_duration() {
        run_test_server();

        let started = Instant::now();
        let mut response = ureq::get(&url("/api/slow")).call().unwrap();
        let elapsed = started.elapsed();

        assert_eq!(response.body_mut().read_to_string().unwrap(), "eventually");
        assert!(elapsed >= Duration::from_millis(120), "elapsed was {elapsed:?}");
    }

    #[test]
    fn store_api_round_trips_a_value_through_put_and_get() {
        run_test_server();

        let put = ureq::put(&url("/system/store/widgets/alpha"))
            .send(b"7".as_slice())
            .unwrap();
        assert_eq!(put.status(), 201);

        let mut got = ureq::get(&url("/system/store/widgets/alpha")).call().unwrap();
        assert_eq!(got.body_mut().read_to_string().unwrap(), "7");

        let overwrite = ureq::put(&url("/system/store/widgets/alpha"))
            .send(b"8".as_slice())
            .unwrap();
        assert_eq!(overwrite.status(), 204);
    }

    #[test]
    fn cors_preflight_echoes_an_allowed_origin() {
        run_test_server();

        let response = ureq::request("OPTIONS", &url("/api/items/42"))
            .header("Origin", "https://app.example.com")
            .header("Access-Control-Request-Method", "GET")
            .call()
            .unwrap();

        assert_eq!(response.status(), 204);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .map(|v| v.to_str().unwrap()),
            Some("https://app.example.com")
        );
    }
}
