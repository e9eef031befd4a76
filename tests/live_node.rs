//! Live Node Integration Tests
//!
//! These tests hit public Ethereum endpoints and are marked #[ignore]
//! for CI environments.
//!
//! To run: `cargo test --test live_node -- --ignored`

use ethscope::{Config, Parser};

const HTTP_URL: &str = "https://cloudflare-eth.com";
const WS_URL: &str = "wss://ethereum-rpc.publicnode.com";

#[tokio::test]
#[ignore = "Requires network access to public Ethereum endpoints"]
async fn test_get_current_block_from_live_node() {
    let parser = Parser::new(&Config::new(HTTP_URL, WS_URL)).unwrap();

    let block = parser.get_current_block().await.unwrap();
    assert!(block > 0, "expected a nonzero block number");

    parser.shutdown().await.unwrap();
}

#[tokio::test]
#[ignore = "Requires network access to public Ethereum endpoints"]
async fn test_subscribe_against_live_feed() {
    let parser = Parser::new(&Config::new(HTTP_URL, WS_URL)).unwrap();

    assert!(parser.subscribe("0x0000000000000000000000000000000000000002"));
    assert!(parser
        .get_transactions("0x0000000000000000000000000000000000000002")
        .is_empty());

    parser.shutdown().await.unwrap();
}
