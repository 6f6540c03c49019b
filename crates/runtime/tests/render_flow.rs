#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use {
    async_trait::async_trait,
    herald_channels::{MessageId, ReplyChannel, ReplyPayload, ReplyTarget},
    herald_config::HeraldConfig,
    herald_runtime::{
        AccessTier, ApiClientFactory, Credential, EventContext, EventRuntime, IdentityResolver,
        LookupMode, RenderData, RenderEngine, RenderOptions, RenderOutcome, RenderRequest,
        ResolvedIdentity, ResponseMode, RuntimeServices,
    },
    serde_json::{Value, json},
};

struct Resolver;

#[async_trait]
impl IdentityResolver for Resolver {
    async fn resolve(
        &self,
        _event: &EventContext,
        mode: LookupMode,
    ) -> anyhow::Result<ResolvedIdentity> {
        Ok(match mode {
            LookupMode::RoleIndex => ResolvedIdentity::new("100000001"),
            LookupMode::Detail => ResolvedIdentity::new("100000001").with_credential("ltoken=x"),
        })
    }
}

struct Clients;

impl ApiClientFactory for Clients {
    type Client = String;

    fn construct(&self, uid: &str, _credential: &Credential, _options: &Value) -> String {
        format!("client:{uid}")
    }
}

#[derive(Default)]
struct Engine {
    targets: Mutex<Vec<String>>,
}

#[async_trait]
impl RenderEngine for Engine {
    async fn capture(&self, target: &str, _data: &RenderData) -> anyhow::Result<Option<String>> {
        self.targets.lock().unwrap().push(target.to_string());
        Ok(Some("IMG_B64".into()))
    }
}

#[derive(Default)]
struct Reply {
    sent: Mutex<Vec<ReplyPayload>>,
}

#[async_trait]
impl ReplyChannel for Reply {
    async fn send(&self, payload: ReplyPayload) -> herald_channels::Result<Option<MessageId>> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(payload);
        Ok(Some(format!("m{}", sent.len())))
    }
}

fn setup(
    data_dir: &std::path::Path,
) -> (EventRuntime<Clients>, Arc<Reply>, Arc<Engine>) {
    let mut config = HeraldConfig::default();
    config.runtime.data_dir = data_dir.to_path_buf();

    let engine = Arc::new(Engine::default());
    let services = RuntimeServices::new(
        Arc::new(Resolver),
        Arc::new(Clients),
        Arc::clone(&engine) as Arc<dyn RenderEngine>,
        &config,
    );

    let reply = Arc::new(Reply::default());
    let event = EventContext::new(
        ReplyTarget {
            channel_type: "qq".into(),
            account_id: "bot".into(),
            chat_id: "group-7".into(),
        },
        Arc::clone(&reply) as Arc<dyn ReplyChannel>,
    );
    (
        EventRuntime::attach(Arc::new(event), &services),
        reply,
        engine,
    )
}

#[tokio::test]
async fn renders_card_and_replies_with_image() {
    let tmp = tempfile::tempdir().unwrap();
    let (runtime, reply, engine) = setup(tmp.path());

    let outcome = runtime
        .render(RenderRequest::new("demo", "card.html"))
        .await
        .unwrap();

    assert_eq!(outcome, RenderOutcome::Sent);
    assert!(outcome.is_truthy());
    assert!(tmp.path().join("html").join("demo").join("card").is_dir());
    assert_eq!(engine.targets.lock().unwrap().as_slice(), ["demo/card"]);
    assert_eq!(
        reply.sent.lock().unwrap().as_slice(),
        &[ReplyPayload::image("IMG_B64")]
    );
}

#[tokio::test]
async fn handler_flow_resolves_client_then_renders_by_message_id() {
    let tmp = tempfile::tempdir().unwrap();
    let (runtime, reply, _engine) = setup(tmp.path());

    let client = runtime.client(AccessTier::Cookie, &Value::Null).await;
    assert_eq!(client.as_deref(), Some("client:100000001"));
    assert_eq!(runtime.requesting_uid().await.as_deref(), Some("100000001"));

    let Value::Object(data) = json!({"saveId": "abyss-100000001"}) else {
        unreachable!()
    };
    let request = RenderRequest::new("demo", "abyss//floor/")
        .with_data(data)
        .with_options(RenderOptions::mode(ResponseMode::MessageId));
    let outcome = runtime.render(request).await.unwrap();

    assert_eq!(outcome, RenderOutcome::MessageId(Some("m1".into())));
    assert_eq!(reply.sent.lock().unwrap().len(), 1);
    assert!(tmp.path().join("html/demo/abyss/floor").is_dir());
}
