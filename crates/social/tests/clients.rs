use std::time::Duration;

use assert_matches::assert_matches;
use httpmock::MockServer;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use pressline_core::SocialPlatform;
use pressline_social::bigquery::{BigQueryClient, ServiceAccountKey, TableRef};
use pressline_social::bluesky::{BlueskyClient, BlueskyCredentials};
use pressline_social::misskey::{MisskeyClient, MisskeyCredentials};
use pressline_social::oauth1::OAuth1Credentials;
use pressline_social::openai::{OpenAiClient, OpenAiCredentials};
use pressline_social::poster::{BlueskyPoster, MisskeyPoster, TwitterPoster};
use pressline_social::twitter::TwitterClient;
use pressline_social::{download_image, PostImage, SocialError, SocialPost, SocialPoster};
use serde_json::json;

const PRIVATE_KEY: &str = include_str!("fixtures/service_account_key.pem");
const PUBLIC_KEY: &str = include_str!("fixtures/service_account_key.pub.pem");

fn image() -> PostImage {
    PostImage {
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        content_type: "image/jpeg".into(),
        filename: "23576.jpg".into(),
    }
}

fn twitter_credentials() -> OAuth1Credentials {
    serde_json::from_value(json!({"CK": "ck", "CS": "cs", "AT": "at", "ATS": "ats"})).unwrap()
}

// ---------------------------------------------------------------------------
// Twitter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn twitter_poster_uploads_media_then_tweets() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/1.1/media/upload.json")
                .header_exists("authorization");
            then.status(200).json_body(json!({"media_id_string": "710511363345354753"}));
        })
        .await;
    let tweet = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/2/tweets")
                .header_exists("authorization")
                .json_body(json!({"text": "hello", "media": {"media_ids": ["710511363345354753"]}}));
            then.status(201).json_body(json!({"data": {"id": "1445880548472328192", "text": "hello"}}));
        })
        .await;

    let client = TwitterClient::with_base_urls(
        reqwest::Client::new(),
        twitter_credentials(),
        server.base_url(),
        server.base_url(),
    );
    let poster = TwitterPoster::new(client);
    let id = poster
        .post(&SocialPost::text("hello").with_image(image()))
        .await
        .unwrap();

    assert_eq!(id, "1445880548472328192");
    assert_eq!(poster.platform(), SocialPlatform::Twitter);
    upload.assert_async().await;
    tweet.assert_async().await;
}

#[tokio::test]
async fn text_only_tweet_omits_media() {
    let server = MockServer::start_async().await;
    let tweet = server
        .mock_async(|when, then| {
            when.method("POST").path("/2/tweets").json_body(json!({"text": "only text"}));
            then.status(201).json_body(json!({"data": {"id": "1"}}));
        })
        .await;

    let client = TwitterClient::with_base_urls(
        reqwest::Client::new(),
        twitter_credentials(),
        server.base_url(),
        server.base_url(),
    );
    assert_eq!(client.create_tweet("only text", &[]).await.unwrap(), "1");
    tweet.assert_async().await;
}

#[tokio::test]
async fn twitter_rate_limit_surfaces_as_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("POST").path("/2/tweets");
            then.status(429).body("Too Many Requests");
        })
        .await;

    let client = TwitterClient::with_base_urls(
        reqwest::Client::new(),
        twitter_credentials(),
        server.base_url(),
        server.base_url(),
    );
    let err = client.create_tweet("x", &[]).await.unwrap_err();
    assert_matches!(
        err,
        SocialError::Api { service: "Twitter", status: 429, ref body } if body == "Too Many Requests"
    );
}

// ---------------------------------------------------------------------------
// Misskey
// ---------------------------------------------------------------------------

#[tokio::test]
async fn misskey_poster_uploads_file_then_creates_note() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method("POST").path("/api/drive/files/create");
            then.status(200).json_body(json!({"id": "9abc", "name": "23576.jpg"}));
        })
        .await;
    let note = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/api/notes/create")
                .json_body(json!({"i": "token", "text": "hello", "fileIds": ["9abc"]}));
            then.status(200).json_body(json!({"createdNote": {"id": "note1"}}));
        })
        .await;

    let client = MisskeyClient::new(
        reqwest::Client::new(),
        server.base_url(),
        MisskeyCredentials { token: "token".into() },
    );
    let poster = MisskeyPoster::new(client);
    let id = poster
        .post(&SocialPost::text("hello").with_image(image()))
        .await
        .unwrap();

    assert_eq!(id, "note1");
    upload.assert_async().await;
    note.assert_async().await;
}

// ---------------------------------------------------------------------------
// Bluesky
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bluesky_poster_logs_in_uploads_thumb_and_embeds_link() {
    let server = MockServer::start_async().await;
    let session = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/xrpc/com.atproto.server.createSession")
                .json_body(json!({"identifier": "bot.bsky.social", "password": "pw"}));
            then.status(200)
                .json_body(json!({"accessJwt": "jwt", "did": "did:plc:abc", "handle": "bot"}));
        })
        .await;
    let blob = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/xrpc/com.atproto.repo.uploadBlob")
                .header("authorization", "Bearer jwt")
                .header("content-type", "image/jpeg");
            then.status(200).json_body(json!({"blob": {"$type": "blob", "mimeType": "image/jpeg", "size": 4}}));
        })
        .await;
    let record = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/xrpc/com.atproto.repo.createRecord")
                .header("authorization", "Bearer jwt")
                .json_body_includes(
                    r#"{"repo":"did:plc:abc","collection":"app.bsky.feed.post",
                        "record":{"text":"【新規記事】 : 題",
                                  "embed":{"external":{"uri":"https://site/archives/1","title":"題",
                                           "thumb":{"size":4}}}}}"#,
                );
            then.status(200)
                .json_body(json!({"uri": "at://did:plc:abc/app.bsky.feed.post/3k", "cid": "c"}));
        })
        .await;

    let poster = BlueskyPoster::new(
        BlueskyClient::new(reqwest::Client::new(), server.base_url()),
        BlueskyCredentials {
            identifier: "bot.bsky.social".into(),
            password: "pw".into(),
        },
    );
    let post = SocialPost::text("【新規記事】 : 題")
        .with_image(image())
        .with_link("https://site/archives/1", "題");
    let uri = poster.post(&post).await.unwrap();

    assert_eq!(uri, "at://did:plc:abc/app.bsky.feed.post/3k");
    session.assert_async().await;
    blob.assert_async().await;
    record.assert_async().await;
}

#[tokio::test]
async fn bluesky_login_failure_stops_before_posting() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/xrpc/com.atproto.server.createSession");
            then.status(401).json_body(json!({"error": "AuthenticationRequired"}));
        })
        .await;
    let record = server
        .mock_async(|when, then| {
            when.path("/xrpc/com.atproto.repo.createRecord");
            then.status(200).json_body(json!({"uri": "x"}));
        })
        .await;

    let poster = BlueskyPoster::new(
        BlueskyClient::new(reqwest::Client::new(), server.base_url()),
        BlueskyCredentials {
            identifier: "a".into(),
            password: "b".into(),
        },
    );
    let err = poster.post(&SocialPost::text("t")).await.unwrap_err();
    assert_matches!(err, SocialError::Api { service: "Bluesky", status: 401, .. });
    record.assert_hits_async(0).await;
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

#[tokio::test]
async fn openai_returns_vector_and_token_count() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/embeddings")
                .header("authorization", "Bearer sk-test")
                .json_body(json!({"input": "本文", "model": "text-embedding-3-small"}));
            then.status(200).json_body(json!({
                "object": "list",
                "data": [{"object": "embedding", "index": 0, "embedding": [0.25, -0.5]}],
                "usage": {"prompt_tokens": 7, "total_tokens": 7}
            }));
        })
        .await;

    let client = OpenAiClient::new(
        reqwest::Client::new(),
        server.base_url(),
        OpenAiCredentials { api_key: "sk-test".into() },
    );
    let embedding = client.embed("本文").await.unwrap();

    assert_eq!(embedding.vector, vec![0.25, -0.5]);
    assert_eq!(embedding.token_count, 7);
    mock.assert_async().await;
}

#[tokio::test]
async fn openai_empty_data_is_unexpected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/embeddings");
            then.status(200).json_body(json!({"data": [], "usage": {"total_tokens": 0}}));
        })
        .await;

    let client = OpenAiClient::new(
        reqwest::Client::new(),
        server.base_url(),
        OpenAiCredentials { api_key: "k".into() },
    );
    assert_matches!(
        client.embed("x").await,
        Err(SocialError::UnexpectedResponse { service: "OpenAI", .. })
    );
}

// ---------------------------------------------------------------------------
// BigQuery
// ---------------------------------------------------------------------------

fn service_account(server: &MockServer) -> ServiceAccountKey {
    ServiceAccountKey {
        client_email: "loader@proj.iam.gserviceaccount.com".into(),
        private_key: PRIVATE_KEY.into(),
        token_uri: server.url("/token"),
        project_id: "proj".into(),
    }
}

#[test]
fn bigquery_assertion_is_rs256_with_expected_claims() {
    let key = ServiceAccountKey {
        client_email: "loader@proj.iam.gserviceaccount.com".into(),
        private_key: PRIVATE_KEY.into(),
        token_uri: "https://oauth2.example/token".into(),
        project_id: "proj".into(),
    };
    let client = BigQueryClient::new(reqwest::Client::new(), key);
    let now = chrono::Utc::now().timestamp();
    let assertion = client.signed_assertion(now).unwrap();

    let header = jsonwebtoken::decode_header(&assertion).unwrap();
    assert_eq!(header.alg, Algorithm::RS256);

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&["https://oauth2.example/token"]);
    let public_key = DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap();
    let claims = jsonwebtoken::decode::<serde_json::Value>(&assertion, &public_key, &validation)
        .unwrap()
        .claims;
    assert_eq!(claims["iss"], "loader@proj.iam.gserviceaccount.com");
    assert_eq!(claims["scope"], "https://www.googleapis.com/auth/bigquery");
    assert_eq!(claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(), 3600);
}

#[tokio::test]
async fn bigquery_query_decodes_typed_rows() {
    let server = MockServer::start_async().await;
    let token = server
        .mock_async(|when, then| {
            when.method("POST").path("/token");
            then.status(200).json_body(json!({"access_token": "ya29", "expires_in": 3599}));
        })
        .await;
    let query = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/projects/proj/queries")
                .header("authorization", "Bearer ya29")
                .json_body_includes(r#"{"useLegacySql": false}"#);
            then.status(200).json_body(json!({
                "jobComplete": true,
                "schema": {"fields": [
                    {"name": "post_id", "type": "INTEGER"},
                    {"name": "post_title", "type": "STRING"}
                ]},
                "rows": [
                    {"f": [{"v": "23576"}, {"v": "無神論者の火"}]},
                    {"f": [{"v": "1"}, {"v": "二"}]}
                ]
            }));
        })
        .await;

    #[derive(serde::Deserialize)]
    struct Row {
        post_id: i64,
        post_title: String,
    }

    let client = BigQueryClient::with_base_urls(
        reqwest::Client::new(),
        service_account(&server),
        server.base_url(),
        server.base_url(),
    );
    let rows: Vec<Row> = client.query("SELECT 1").await.unwrap();
    let again: Vec<Row> = client.query("SELECT 1").await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(again.len(), 2);
    assert_eq!(rows[0].post_id, 23576);
    assert_eq!(rows[0].post_title, "無神論者の火");
    token.assert_hits_async(1).await;
    query.assert_hits_async(2).await;
}

#[tokio::test]
async fn bigquery_load_polls_until_done() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("POST").path("/token");
            then.status(200).json_body(json!({"access_token": "ya29"}));
        })
        .await;
    let load = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/projects/proj/jobs")
                .query_param("uploadType", "multipart");
            then.status(200).json_body(json!({
                "jobReference": {"jobId": "job_1", "location": "US"},
                "status": {"state": "RUNNING"}
            }));
        })
        .await;
    let poll = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/projects/proj/jobs/job_1")
                .query_param("location", "US");
            then.status(200).json_body(json!({
                "jobReference": {"jobId": "job_1", "location": "US"},
                "status": {"state": "DONE"}
            }));
        })
        .await;

    let client = BigQueryClient::with_base_urls(
        reqwest::Client::new(),
        service_account(&server),
        server.base_url(),
        server.base_url(),
    )
    .with_poll_interval(Duration::from_millis(1));
    let table = TableRef {
        dataset_id: "HPE_RAW".into(),
        table_id: "dim_posts".into(),
    };
    let job_id = client
        .load_ndjson(&table, &[json!({"post_id": 1})])
        .await
        .unwrap();

    assert_eq!(job_id, "job_1");
    load.assert_async().await;
    poll.assert_async().await;
}

#[tokio::test]
async fn bigquery_failed_job_reports_error_result() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("POST").path("/token");
            then.status(200).json_body(json!({"access_token": "ya29"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method("POST").path("/projects/proj/jobs");
            then.status(200).json_body(json!({
                "jobReference": {"jobId": "job_2"},
                "status": {"state": "DONE", "errorResult": {"message": "bad row"}}
            }));
        })
        .await;

    let client = BigQueryClient::with_base_urls(
        reqwest::Client::new(),
        service_account(&server),
        server.base_url(),
        server.base_url(),
    );
    let table = TableRef {
        dataset_id: "HPE_RAW".into(),
        table_id: "t".into(),
    };
    let err = client.load_ndjson(&table, &[json!({})]).await.unwrap_err();
    assert_matches!(err, SocialError::UnexpectedResponse { ref message, .. } if message.contains("bad row"));
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn download_keeps_content_type_and_filename() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/og/23576.jpg");
            then.status(200)
                .header("content-type", "image/jpeg")
                .body(vec![1u8, 2, 3]);
        })
        .await;

    let image = download_image(&reqwest::Client::new(), &server.url("/og/23576.jpg"))
        .await
        .unwrap();
    assert_eq!(image.bytes, vec![1, 2, 3]);
    assert_eq!(image.content_type, "image/jpeg");
    assert_eq!(image.filename, "23576.jpg");
}

#[tokio::test]
async fn download_missing_image_is_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/missing.jpg");
            then.status(404);
        })
        .await;

    let err = download_image(&reqwest::Client::new(), &server.url("/missing.jpg"))
        .await
        .unwrap_err();
    assert_matches!(err, SocialError::Api { status: 404, .. });
}
