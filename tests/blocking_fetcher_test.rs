//! Blocking facade tests
//!
//! Plain `#[test]` functions: the facade owns its runtime, so no async test
//! harness is involved.

mod support;

use mockito::Server;
use support::mockito::{fetcher_for_url, site_path};
use tableau_views::{BlockingViewContentFetcher, ImageFilters, Operation, TicketToken};

const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

#[test]
fn blocking_get_image_returns_body() {
    let mut server = Server::new();
    let m = server
        .mock("GET", site_path("workbooks/wb-1/views/v-1/image").as_str())
        .match_header("x-tableau-auth", support::TOKEN)
        .with_status(200)
        .with_body(PNG_MAGIC)
        .expect(1)
        .create();

    let fetcher = BlockingViewContentFetcher::new(fetcher_for_url(&server.url())).unwrap();
    let bytes = fetcher.get_image("wb-1", "v-1").unwrap();

    assert_eq!(bytes, PNG_MAGIC);
    m.assert();
}

#[test]
fn blocking_operations_share_fetch_semantics() {
    let mut server = Server::new();
    let _thumb = server
        .mock(
            "GET",
            site_path("workbooks/wb-1/views/v-1/previewImage").as_str(),
        )
        .with_status(200)
        .with_body("thumb")
        .create();
    let _data = server
        .mock("GET", site_path("views/v-1/data").as_str())
        .with_status(200)
        .with_body("a,b\n1,2\n")
        .create();
    let _trusted = server
        .mock(
            "GET",
            mockito::Matcher::Regex(r"^/trusted/T1/t/AssessmentTool/views/Responses/Snapshot\.png\?".into()),
        )
        .with_status(500)
        .create();

    let fetcher = BlockingViewContentFetcher::new(fetcher_for_url(&server.url())).unwrap();

    assert_eq!(fetcher.get_preview_thumbnail("wb-1", "v-1").unwrap(), b"thumb");
    assert_eq!(fetcher.get_data("v-1").unwrap(), "a,b\n1,2\n");

    let err = fetcher
        .get_image_with_filters(
            "wb-1",
            "v-1",
            &ImageFilters::new("a", "b", "c", "d"),
            &TicketToken::new("T1"),
        )
        .unwrap_err();
    assert_eq!(err.operation(), Some(Operation::ViewImageWithFilters));
    assert_eq!(err.status_code(), Some(500));
}
