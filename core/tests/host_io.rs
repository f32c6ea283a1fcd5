//! Drive the build/parse split from a synchronous host.
//!
//! # Design
//! Starts the mock server on a random port on its own runtime thread, then
//! executes every request the client builds with blocking ureq calls. No
//! async runtime or `Transport` is involved on the client side, which is
//! the point: the client itself never does I/O.

use animal_spotter_core::{
    AnimalSpotterClient, ApiError, HttpMethod, HttpRequest, HttpResponse, ImageError, User,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data, letting the client interpret them.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match req.method {
        HttpMethod::Get => {
            let mut builder = agent.get(&req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Post => {
            let mut builder = agent.post(&req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.send(req.body.as_deref().unwrap_or(&[]))
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_vec().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn blocking_host_lifecycle() {
    let addr = start_server();
    let client = AnimalSpotterClient::new(&format!("http://{addr}/api")).unwrap();
    let user = User::new("host", "io");

    // Step 1: sign up, then sign in.
    let req = client.build_sign_up(&user).unwrap();
    client.parse_sign_up(execute(req)).unwrap();

    let req = client.build_sign_in(&user).unwrap();
    let bearer = client.parse_sign_in(execute(req)).unwrap();
    assert!(!bearer.token.is_empty());

    // Step 2: list names.
    let req = client.build_list_names(&bearer);
    let names = client.parse_list_names(execute(req)).unwrap();
    assert_eq!(names.len(), 3);

    // Step 3: details and image for every listed animal.
    for name in &names {
        let req = client.build_fetch_details(&bearer, name).unwrap();
        let animal = client.parse_fetch_details(execute(req)).unwrap();
        assert_eq!(&animal.name, name);

        let req = client.build_fetch_image(&animal.image_url).unwrap();
        let image = client.parse_fetch_image(execute(req)).unwrap();
        assert_eq!(image.width, 8);
    }

    // Step 4: a forged token is rejected by status, not by decoding.
    let forged = animal_spotter_core::Bearer::new("forged");
    let req = client.build_list_names(&forged);
    let err = client.parse_list_names(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedStatusCode { status: 401 }));

    // Step 5: missing image.
    let req = client
        .build_fetch_image(&format!("http://{addr}/images/missing.png"))
        .unwrap();
    let err = client.parse_fetch_image(execute(req)).unwrap_err();
    assert!(matches!(err, ImageError::UnexpectedStatusCode { status: 404 }));
}
