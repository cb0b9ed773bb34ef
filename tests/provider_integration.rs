//! Provider integration tests.
//!
//! These tests run the JSON-RPC wallet and HTTP profile adapters against
//! in-process axum servers, then drive a full session through them.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use wallet_session::provider::{HttpProfiles, InjectedWallet, RpcWallet};
use wallet_session::{
    Address, FailurePolicy, ProfileProvider, UserSession, UserState, WalletProvider,
    WalletSessionError,
};

/// Start a server on an ephemeral port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Behaviour of the fake wallet node.
#[derive(Clone, Copy)]
enum Node {
    Approve,
    Reject,
    Broken,
    NoAccounts,
}

async fn rpc(State(node): State<Node>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default();

    let outcome = match (node, method) {
        (Node::Reject, "eth_requestAccounts") => {
            Err(json!({ "code": 4001, "message": "User rejected the request." }))
        }
        (Node::Broken, _) => Err(json!({ "code": -32603, "message": "Internal error" })),
        (Node::NoAccounts, _) => Ok(json!([])),
        (_, "eth_requestAccounts" | "eth_accounts") => Ok(json!(["0x1"])),
        _ => Err(json!({ "code": -32601, "message": "Method not found" })),
    };

    Json(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
    })
}

async fn wallet_node(node: Node) -> String {
    serve(Router::new().route("/", post(rpc)).with_state(node)).await
}

async fn profile(Path(address): Path<String>) -> Response {
    match address.as_str() {
        "0x1" => Json(json!({ "email": "a@b.com" })).into_response(),
        "0xABC" => Json(json!({ "name": "Alice" })).into_response(),
        "0x2" => Json(json!(["not", "an", "object"])).into_response(),
        "0xbad" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn profile_service() -> String {
    let base = serve(Router::new().route("/profiles/{address}", get(profile))).await;
    format!("{}/profiles", base)
}

fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

// ============================================================================
// RPC Wallet Tests
// ============================================================================

#[tokio::test]
async fn test_rpc_wallet_approves() {
    let wallet = RpcWallet::new(wallet_node(Node::Approve).await);

    wallet.request_accounts().await.unwrap();
    assert_eq!(wallet.signer_address().await.unwrap(), addr("0x1"));
}

#[tokio::test]
async fn test_rpc_wallet_user_rejected() {
    let wallet = RpcWallet::new(wallet_node(Node::Reject).await);

    assert_eq!(
        wallet.request_accounts().await,
        Err(WalletSessionError::UserRejected)
    );
}

#[tokio::test]
async fn test_rpc_wallet_provider_error() {
    let wallet = RpcWallet::new(wallet_node(Node::Broken).await);

    let err = wallet.request_accounts().await.unwrap_err();
    assert_eq!(
        err,
        WalletSessionError::Provider("Internal error (code -32603)".into())
    );
}

#[tokio::test]
async fn test_rpc_wallet_no_accounts() {
    let wallet = RpcWallet::new(wallet_node(Node::NoAccounts).await);

    wallet.request_accounts().await.unwrap();
    assert!(matches!(
        wallet.signer_address().await,
        Err(WalletSessionError::Provider(_))
    ));
}

#[tokio::test]
async fn test_rpc_wallet_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let wallet = RpcWallet::new(url);
    assert!(matches!(
        wallet.request_accounts().await,
        Err(WalletSessionError::Provider(_))
    ));
}

// ============================================================================
// HTTP Profile Tests
// ============================================================================

#[tokio::test]
async fn test_http_profile_found() {
    let profiles = HttpProfiles::new(profile_service().await);

    let found = profiles.get_profile(&addr("0x1")).await.unwrap();
    assert_eq!(Value::Object(found), json!({ "email": "a@b.com" }));
}

#[tokio::test]
async fn test_http_profile_not_found() {
    let profiles = HttpProfiles::new(profile_service().await);

    assert_eq!(
        profiles.get_profile(&addr("0x9")).await,
        Err(WalletSessionError::NotFound("0x9".into()))
    );
}

#[tokio::test]
async fn test_http_profile_server_error() {
    let profiles = HttpProfiles::new(profile_service().await);

    let err = profiles.get_profile(&addr("0xbad")).await.unwrap_err();
    assert!(err.is_profile_error());
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_http_profile_not_an_object() {
    let profiles = HttpProfiles::new(profile_service().await);

    assert_eq!(
        profiles.get_profile(&addr("0x2")).await,
        Err(WalletSessionError::Network(
            "unexpected profile payload".into()
        ))
    );
}

// ============================================================================
// End-to-End Session Tests
// ============================================================================

async fn session(node: Node) -> UserSession {
    let wallet = InjectedWallet::installed(Arc::new(RpcWallet::new(wallet_node(node).await)));
    let profiles = HttpProfiles::new(profile_service().await);
    UserSession::new(Arc::new(wallet), Arc::new(profiles))
}

#[tokio::test]
async fn test_session_connects_over_http() {
    let session = session(Node::Approve).await;

    let user = session.connect().await.unwrap();
    assert_eq!(session.current(), UserState::Present(user));
    assert_eq!(
        serde_json::to_value(session.current()).unwrap(),
        json!({ "address": "0x1", "email": "a@b.com" })
    );

    session.disconnect();
    assert_eq!(session.current(), UserState::Absent);
}

#[tokio::test]
async fn test_session_rejected_over_http() {
    let session = session(Node::Reject).await.with_failure_policy(FailurePolicy::Keep);

    assert_eq!(
        session.connect().await.unwrap_err(),
        WalletSessionError::UserRejected
    );
    assert_eq!(session.current(), UserState::Absent);
    assert!(!session.is_connecting());
}
