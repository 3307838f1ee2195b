//! End-to-end command tests against the in-memory policy service.

use std::sync::{Arc, Mutex};

use clap::Parser;
use policyctl_cli::{execute, Cli, CliError, Confirmer, Console, Handler, OutputFormat};
use policyctl_client::{AttributeValueUpdate, KasEntryUpdate, NewKasEntry};
use policyctl_core::{LabelPatch, LabelUpdateMode, Labels, PublicKey, StateFilter};
use policyctl_test::{Call, FakePolicyService, MockAttribute, MockKasEntry, MockValue};

/// Answers every prompt the same way and remembers the questions.
#[derive(Clone)]
struct Scripted {
    answer: Option<bool>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Scripted {
    fn new(answer: Option<bool>) -> Self {
        Self {
            answer,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirmer for Scripted {
    fn confirm(&self, prompt: &str) -> Option<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

struct Outcome {
    result: Result<(), CliError>,
    stdout: String,
}

async fn run_with(
    fake: &FakePolicyService,
    confirmer: Scripted,
    format: OutputFormat,
    args: &[&str],
) -> Outcome {
    let mut argv = vec!["policyctl"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("arguments should parse");

    let mut console = Console::new(Vec::new(), format, Box::new(confirmer));
    let result = execute(cli.command, Handler::new(fake.clone()), &mut console).await;
    Outcome {
        result,
        stdout: String::from_utf8(console.into_inner()).unwrap(),
    }
}

async fn run(fake: &FakePolicyService, args: &[&str]) -> Outcome {
    run_with(fake, Scripted::new(Some(true)), OutputFormat::Table, args).await
}

fn seeded() -> FakePolicyService {
    let fake = FakePolicyService::new();
    fake.seed_kas_entry(
        MockKasEntry::new("https://kas.example")
            .with_id("k1")
            .with_local_key("OLDKEY")
            .build(),
    );
    fake.seed_attribute(
        MockAttribute::new("classification")
            .with_id("a1")
            .with_values(["secret", "public"])
            .build(),
    );
    fake.seed_value(
        MockValue::new("a1", "top")
            .with_id("v1")
            .with_members(["m1", "m2"])
            .build(),
    );
    fake.seed_value(MockValue::new("a1", "retired").with_id("v2").inactive().build());
    fake.seed_value(MockValue::new("a1", "m").with_id("m1").build());
    fake.seed_value(MockValue::new("a1", "n").with_id("m2").build());
    fake
}

// ---------------------------------------------------------------------------
// Argument errors never reach the service
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_required_flags_make_no_calls() {
    let cases: &[(&[&str], &str)] = &[
        (&["kas-registry", "get"], "id"),
        (&["kas-registry", "delete"], "id"),
        (&["kas-registry", "create", "--public-key-local", "K"], "uri"),
        (&["attribute-values", "get"], "id"),
        (&["attribute-values", "create", "--value", "x"], "attribute-id"),
        (&["attribute-values", "create", "--attribute-id", "a1"], "value"),
        (&["attribute-values", "list"], "attribute-id"),
        (&["attribute-values", "deactivate"], "id"),
        (&["attributes", "create", "--rule", "ANY_OF", "--namespace", "ns"], "name"),
        (&["attributes", "deactivate"], "id"),
    ];

    for (args, flag) in cases {
        let fake = seeded();
        let outcome = run(&fake, args).await;
        let err = outcome.result.unwrap_err();
        assert!(
            matches!(&err, CliError::MissingFlag { flag: f } if f == flag),
            "{args:?}: unexpected error {err}"
        );
        assert_eq!(err.exit_code(), 2);
        assert!(fake.calls().is_empty(), "{args:?} made calls");
        assert!(outcome.stdout.is_empty());
    }
}

#[tokio::test]
async fn test_kas_create_with_both_keys_is_rejected() {
    let fake = seeded();
    let outcome = run(
        &fake,
        &[
            "kas-registry",
            "create",
            "--uri",
            "https://kas.example",
            "--public-key-local",
            "ABC123",
            "--public-key-remote",
            "https://kas.example/key",
        ],
    )
    .await;

    let err = outcome.result.unwrap_err();
    assert!(err.to_string().contains("Only one public key is allowed"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_kas_update_with_both_keys_is_rejected() {
    let fake = seeded();
    let outcome = run(
        &fake,
        &[
            "kas-registry",
            "update",
            "--id",
            "k1",
            "--public-key-local",
            "ABC123",
            "--public-key-remote",
            "https://kas.example/key",
        ],
    )
    .await;

    assert!(outcome.result.unwrap_err().is_argument_error());
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_kas_create_without_key_is_rejected() {
    let fake = seeded();
    let outcome = run(&fake, &["kas-registry", "create", "--uri", "https://kas.example"]).await;

    let err = outcome.result.unwrap_err();
    assert!(err.to_string().contains("A public key is required"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_kas_update_with_only_id_is_rejected() {
    let fake = seeded();
    let outcome = run(&fake, &["kas-registry", "update", "--id", "k1"]).await;

    let err = outcome.result.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_value_update_without_labels_is_rejected() {
    let fake = seeded();
    let outcome = run(&fake, &["attribute-values", "update", "--id", "v1"]).await;

    let err = outcome.result.unwrap_err();
    assert!(err.to_string().contains("--label"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_bad_label_is_rejected() {
    let fake = seeded();
    let outcome = run(
        &fake,
        &["attribute-values", "update", "--id", "v1", "--label", "novalue"],
    )
    .await;

    assert!(outcome.result.unwrap_err().to_string().starts_with("Invalid --label"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_bad_rule_is_rejected() {
    let fake = seeded();
    let outcome = run(
        &fake,
        &["attributes", "create", "--name", "x", "--rule", "SOME_OF", "--namespace", "ns"],
    )
    .await;

    assert!(outcome.result.unwrap_err().to_string().starts_with("Invalid --rule"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_members_require_at_least_one() {
    let fake = seeded();
    let outcome = run(&fake, &["attribute-values", "members", "add", "--id", "v1"]).await;

    assert!(outcome.result.unwrap_err().to_string().contains("--member"));
    assert!(fake.calls().is_empty());
}

// ---------------------------------------------------------------------------
// KAS registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_kas_create_local_key() {
    let fake = FakePolicyService::new();
    let outcome = run(
        &fake,
        &[
            "kas-registry",
            "create",
            "--uri",
            "https://kas.example",
            "--public-key-local",
            "ABC123",
        ],
    )
    .await;

    outcome.result.unwrap();
    assert_eq!(
        fake.calls(),
        vec![Call::CreateKasEntry(NewKasEntry {
            uri: "https://kas.example".to_string(),
            public_key: PublicKey::Local("ABC123".to_string()),
            labels: Labels::new(),
        })]
    );
    assert!(outcome.stdout.contains("PublicKey Type"));
    assert!(outcome.stdout.contains("Local"));
    assert!(outcome.stdout.contains("ABC123"));
}

#[tokio::test]
async fn test_kas_create_remote_key_shows_remote() {
    let fake = FakePolicyService::new();
    let outcome = run(
        &fake,
        &[
            "kas-registry",
            "create",
            "--uri",
            "https://kas.example",
            "--public-key-remote",
            "https://kas.example/key",
        ],
    )
    .await;

    outcome.result.unwrap();
    assert!(outcome.stdout.contains("Remote"));
    assert!(outcome.stdout.contains("https://kas.example/key"));
}

#[tokio::test]
async fn test_kas_get_json() {
    let fake = seeded();
    let outcome = run_with(
        &fake,
        Scripted::new(None),
        OutputFormat::Json,
        &["kas-registry", "get", "--id", "k1"],
    )
    .await;

    outcome.result.unwrap();
    let json: serde_json::Value = serde_json::from_str(&outcome.stdout).unwrap();
    assert_eq!(json["id"], "k1");
    assert_eq!(json["public_key"]["local"], "OLDKEY");
}

#[tokio::test]
async fn test_kas_list() {
    let fake = seeded();
    let outcome = run(&fake, &["kas-registry", "list"]).await;

    outcome.result.unwrap();
    assert_eq!(fake.calls(), vec![Call::ListKasEntries]);
    assert!(outcome.stdout.contains("PublicKey Location"));
    assert!(outcome.stdout.contains("https://kas.example"));
}

#[tokio::test]
async fn test_kas_update_sends_only_supplied_fields() {
    let fake = seeded();
    let outcome = run(
        &fake,
        &[
            "kas-registry",
            "update",
            "--id",
            "k1",
            "--public-key-remote",
            "https://kas.example/key",
            "--label",
            "env=prod",
            "--force-replace-labels",
        ],
    )
    .await;

    outcome.result.unwrap();
    let calls = fake.calls();
    let Call::UpdateKasEntry(update) = &calls[0] else {
        panic!("unexpected call {calls:?}");
    };
    assert_eq!(
        update,
        &KasEntryUpdate {
            id: "k1".to_string(),
            uri: None,
            public_key: Some(PublicKey::Remote("https://kas.example/key".to_string())),
            labels: Some(LabelPatch::new(
                Labels::parse(["env=prod"]).unwrap(),
                LabelUpdateMode::Replace,
            )),
        }
    );
    assert_eq!(fake.stored_kas_entry("k1").unwrap().uri, "https://kas.example");
}

#[tokio::test]
async fn test_kas_delete_confirmed() {
    let fake = seeded();
    let confirmer = Scripted::new(Some(true));
    let outcome = run_with(
        &fake,
        confirmer.clone(),
        OutputFormat::Table,
        &["kas-registry", "delete", "--id", "k1"],
    )
    .await;

    outcome.result.unwrap();
    assert_eq!(
        fake.calls(),
        vec![
            Call::GetKasEntry("k1".to_string()),
            Call::DeleteKasEntry("k1".to_string())
        ]
    );
    assert_eq!(
        confirmer.prompts(),
        vec!["Are you sure you want to delete KAS registry entry: k1?"]
    );
    assert!(outcome.stdout.contains("https://kas.example"));
    assert!(!outcome.stdout.contains("OLDKEY"));
    assert!(fake.stored_kas_entry("k1").is_none());
}

#[tokio::test]
async fn test_kas_delete_declined_makes_no_mutation() {
    for answer in [Some(false), None] {
        let fake = seeded();
        let outcome = run_with(
            &fake,
            Scripted::new(answer),
            OutputFormat::Table,
            &["kas-registry", "delete", "--id", "k1"],
        )
        .await;

        let err = outcome.result.unwrap_err();
        assert!(matches!(err, CliError::Aborted { .. }));
        assert_ne!(err.exit_code(), 0);
        assert_eq!(fake.calls(), vec![Call::GetKasEntry("k1".to_string())]);
        assert!(fake.stored_kas_entry("k1").is_some());
        assert!(outcome.stdout.is_empty());
    }
}

#[tokio::test]
async fn test_kas_delete_missing_never_prompts() {
    let fake = FakePolicyService::new();
    let confirmer = Scripted::new(Some(true));
    let outcome = run_with(
        &fake,
        confirmer.clone(),
        OutputFormat::Table,
        &["kas-registry", "delete", "--id", "ghost"],
    )
    .await;

    let err = outcome.result.unwrap_err();
    assert!(err.to_string().starts_with("Failed to get KAS registry entry (ghost)"));
    assert!(confirmer.prompts().is_empty());
    assert_eq!(fake.calls().len(), 1);
}

// ---------------------------------------------------------------------------
// Attribute values
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_value_get_missing() {
    let fake = FakePolicyService::new();
    let outcome = run(&fake, &["attribute-values", "get", "--id", "v1"]).await;

    let err = outcome.result.unwrap_err();
    assert!(err.to_string().contains("Failed to find attribute value"));
    assert_ne!(err.exit_code(), 0);
    assert!(outcome.stdout.is_empty());
}

#[tokio::test]
async fn test_value_list_defaults_to_active() {
    let fake = seeded();
    let default = run(&fake, &["attribute-values", "list", "--attribute-id", "a1"]).await;
    let explicit = run(
        &fake,
        &["attribute-values", "list", "--attribute-id", "a1", "--state", "active"],
    )
    .await;

    default.result.unwrap();
    explicit.result.unwrap();
    assert_eq!(
        fake.calls(),
        vec![
            Call::ListAttributeValues("a1".to_string(), StateFilter::Active),
            Call::ListAttributeValues("a1".to_string(), StateFilter::Active),
        ]
    );
    assert_eq!(default.stdout, explicit.stdout);
    assert!(!default.stdout.contains("retired"));
}

#[tokio::test]
async fn test_value_list_any_includes_inactive() {
    let fake = seeded();
    let outcome = run(
        &fake,
        &["attribute-values", "list", "--attribute-id", "a1", "--state", "any"],
    )
    .await;

    outcome.result.unwrap();
    assert!(outcome.stdout.contains("retired"));
    assert!(outcome.stdout.contains("false"));
}

#[tokio::test]
async fn test_value_create_checks_attribute_first() {
    let fake = seeded();
    let outcome = run(
        &fake,
        &["attribute-values", "create", "--attribute-id", "a1", "--value", "confidential"],
    )
    .await;

    outcome.result.unwrap();
    let calls = fake.calls();
    assert_eq!(calls[0], Call::GetAttribute("a1".to_string()));
    assert!(matches!(&calls[1], Call::CreateAttributeValue(v) if v.value == "confidential"));
    assert!(outcome.stdout.contains("https://example.com/attr/classification/value/confidential"));
}

#[tokio::test]
async fn test_value_create_unknown_attribute() {
    let fake = FakePolicyService::new();
    let outcome = run(
        &fake,
        &["attribute-values", "create", "--attribute-id", "nope", "--value", "x"],
    )
    .await;

    assert!(outcome
        .result
        .unwrap_err()
        .to_string()
        .starts_with("Failed to find attribute (nope)"));
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test]
async fn test_value_update_labels() {
    let fake = seeded();
    let outcome = run(
        &fake,
        &["attribute-values", "update", "--id", "v1", "--label", "owner=sec"],
    )
    .await;

    outcome.result.unwrap();
    assert_eq!(
        fake.calls(),
        vec![Call::UpdateAttributeValue(AttributeValueUpdate {
            id: "v1".to_string(),
            members: None,
            labels: Some(LabelPatch::new(
                Labels::parse(["owner=sec"]).unwrap(),
                LabelUpdateMode::Extend,
            )),
        })]
    );
    assert_eq!(
        fake.stored_value("v1").unwrap().metadata.labels.get("owner"),
        Some("sec")
    );
}

#[tokio::test]
async fn test_value_deactivate_declined() {
    let fake = seeded();
    let confirmer = Scripted::new(Some(false));
    let outcome = run_with(
        &fake,
        confirmer.clone(),
        OutputFormat::Table,
        &["attribute-values", "deactivate", "--id", "v1"],
    )
    .await;

    assert_eq!(outcome.result.unwrap_err().exit_code(), 3);
    assert_eq!(fake.calls(), vec![Call::GetAttributeValue("v1".to_string())]);
    assert_eq!(
        confirmer.prompts(),
        vec!["Are you sure you want to deactivate attribute value: top?"]
    );
    assert!(fake.stored_value("v1").unwrap().state.is_active());
}

#[tokio::test]
async fn test_value_deactivate_confirmed() {
    let fake = seeded();
    let outcome = run(&fake, &["attribute-values", "deactivate", "--id", "v1"]).await;

    outcome.result.unwrap();
    assert_eq!(
        fake.calls(),
        vec![
            Call::GetAttributeValue("v1".to_string()),
            Call::DeactivateAttributeValue("v1".to_string()),
        ]
    );
    assert!(!fake.stored_value("v1").unwrap().state.is_active());
}

#[tokio::test]
async fn test_members_add_sends_full_list() {
    let fake = seeded();
    run(
        &fake,
        &["attribute-values", "members", "replace", "--id", "v1", "--member", "m1"],
    )
    .await
    .result
    .unwrap();

    let outcome = run(
        &fake,
        &["attribute-values", "members", "add", "--id", "v1", "--member", "m2"],
    )
    .await;

    outcome.result.unwrap();
    assert_eq!(fake.stored_value("v1").unwrap().members, vec!["m1", "m2"]);
    assert!(outcome.stdout.contains("Members"));
    assert!(outcome.stdout.contains("m1, m2"));
}

#[tokio::test]
async fn test_members_remove_declined() {
    let fake = seeded();
    let outcome = run_with(
        &fake,
        Scripted::new(Some(false)),
        OutputFormat::Table,
        &["attribute-values", "members", "remove", "--id", "v1", "--member", "m1"],
    )
    .await;

    assert!(matches!(outcome.result, Err(CliError::Aborted { .. })));
    assert_eq!(fake.calls(), vec![Call::GetAttributeValue("v1".to_string())]);
}

#[tokio::test]
async fn test_members_remove_sends_remaining() {
    let fake = seeded();
    let outcome = run(
        &fake,
        &["attribute-values", "members", "remove", "--id", "v1", "--member", "m1"],
    )
    .await;

    outcome.result.unwrap();
    assert_eq!(
        fake.calls(),
        vec![
            Call::GetAttributeValue("v1".to_string()),
            Call::UpdateAttributeValue(AttributeValueUpdate {
                id: "v1".to_string(),
                members: Some(vec!["m2".to_string()]),
                labels: None,
            }),
        ]
    );
    assert_eq!(fake.stored_value("v1").unwrap().members, vec!["m2"]);
}

#[tokio::test]
async fn test_members_remove_all_is_rejected() {
    let fake = seeded();
    let confirmer = Scripted::new(Some(true));
    let outcome = run_with(
        &fake,
        confirmer.clone(),
        OutputFormat::Table,
        &[
            "attribute-values",
            "members",
            "remove",
            "--id",
            "v1",
            "--member",
            "m1",
            "--member",
            "m2",
        ],
    )
    .await;

    let err = outcome.result.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().starts_with("Invalid --member"));
    assert!(confirmer.prompts().is_empty());
    assert_eq!(fake.calls(), vec![Call::GetAttributeValue("v1".to_string())]);
    assert_eq!(fake.stored_value("v1").unwrap().members, vec!["m1", "m2"]);
    assert!(outcome.stdout.is_empty());
}

#[tokio::test]
async fn test_value_update_replace_labels() {
    let fake = seeded();
    let outcome = run(
        &fake,
        &[
            "attribute-values",
            "update",
            "--id",
            "v1",
            "--label",
            "tier=gold",
            "--force-replace-labels",
        ],
    )
    .await;

    outcome.result.unwrap();
    assert_eq!(
        fake.calls(),
        vec![Call::UpdateAttributeValue(AttributeValueUpdate {
            id: "v1".to_string(),
            members: None,
            labels: Some(LabelPatch::new(
                Labels::parse(["tier=gold"]).unwrap(),
                LabelUpdateMode::Replace,
            )),
        })]
    );
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_attribute_update_merges_labels() {
    let fake = FakePolicyService::new();
    fake.seed_attribute(
        MockAttribute::new("classification")
            .with_id("a1")
            .with_label("owner", "sec")
            .build(),
    );
    let outcome = run(
        &fake,
        &["attributes", "update", "--id", "a1", "--label", "tier=gold"],
    )
    .await;

    outcome.result.unwrap();
    assert_eq!(
        fake.calls(),
        vec![Call::UpdateAttribute(
            "a1".to_string(),
            LabelPatch::new(Labels::parse(["tier=gold"]).unwrap(), LabelUpdateMode::Extend),
        )]
    );
    let labels = fake.stored_attribute("a1").unwrap().metadata.labels;
    assert_eq!(labels.get("owner"), Some("sec"));
    assert_eq!(labels.get("tier"), Some("gold"));
}

#[tokio::test]
async fn test_attribute_update_replace_labels() {
    let fake = FakePolicyService::new();
    fake.seed_attribute(
        MockAttribute::new("classification")
            .with_id("a1")
            .with_label("owner", "sec")
            .build(),
    );
    let outcome = run(
        &fake,
        &[
            "attributes",
            "update",
            "--id",
            "a1",
            "--label",
            "tier=gold",
            "--force-replace-labels",
        ],
    )
    .await;

    outcome.result.unwrap();
    assert_eq!(
        fake.calls(),
        vec![Call::UpdateAttribute(
            "a1".to_string(),
            LabelPatch::new(Labels::parse(["tier=gold"]).unwrap(), LabelUpdateMode::Replace),
        )]
    );
    let labels = fake.stored_attribute("a1").unwrap().metadata.labels;
    assert_eq!(labels.get("owner"), None);
    assert_eq!(labels.get("tier"), Some("gold"));
}

#[tokio::test]
async fn test_attribute_update_without_labels_is_rejected() {
    let fake = seeded();
    let outcome = run(&fake, &["attributes", "update", "--id", "a1"]).await;

    assert_eq!(outcome.result.unwrap_err().exit_code(), 2);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_attribute_create() {
    let fake = FakePolicyService::new();
    let namespace_id = fake.namespace_id("example.com").unwrap();
    let outcome = run(
        &fake,
        &[
            "attributes",
            "create",
            "--name",
            "level",
            "--rule",
            "hierarchy",
            "--namespace",
            &namespace_id,
            "--value",
            "high",
            "--value",
            "low",
        ],
    )
    .await;

    outcome.result.unwrap();
    assert!(outcome.stdout.contains("HIERARCHY"));
    assert!(outcome.stdout.contains("high, low"));
    assert!(outcome.stdout.contains("example.com"));
}

#[tokio::test]
async fn test_attribute_list_and_get() {
    let fake = seeded();
    let list = run(&fake, &["attributes", "list"]).await;
    list.result.unwrap();
    assert!(list.stdout.contains("classification"));

    let get = run(&fake, &["attributes", "get", "--id", "a1"]).await;
    get.result.unwrap();
    assert!(get.stdout.contains("ANY_OF"));
}

#[tokio::test]
async fn test_attribute_deactivate_prompts_with_name() {
    let fake = seeded();
    let confirmer = Scripted::new(Some(true));
    let outcome = run_with(
        &fake,
        confirmer.clone(),
        OutputFormat::Table,
        &["attributes", "deactivate", "--id", "a1"],
    )
    .await;

    outcome.result.unwrap();
    assert_eq!(
        confirmer.prompts(),
        vec!["Are you sure you want to deactivate attribute: classification?"]
    );
    assert_eq!(
        fake.calls(),
        vec![
            Call::GetAttribute("a1".to_string()),
            Call::DeactivateAttribute("a1".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_service_unavailable() {
    let fake = seeded();
    fake.set_unavailable("connection refused");
    let outcome = run(&fake, &["attributes", "list"]).await;

    let err = outcome.result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to list attributes: policy service unavailable: connection refused"
    );
    assert_eq!(err.exit_code(), 1);
    assert!(outcome.stdout.is_empty());
}
