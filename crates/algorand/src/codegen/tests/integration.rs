//! Integration tests for Go client generation

use super::{CALCULATOR_ARC32, HELLO_ARC56};
use crate::codegen::parser::AppSpecParser;
use crate::codegen::{generate_client_code, AlgorandClientCodegen, AlgorandCodegenConfig};
use appclient_common::{Error, Result};
use appclient_core::{GenerationMode, NamePolicy};
use std::fs;
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> AlgorandCodegenConfig {
    AlgorandCodegenConfig {
        output_dir: dir.path().to_str().unwrap().to_string(),
        gofmt: false,
        ..Default::default()
    }
}

/// HelloWorld with its methods replaced
fn hello_with_methods(methods: serde_json::Value) -> String {
    let mut spec: serde_json::Value = serde_json::from_str(HELLO_ARC56).unwrap();
    spec["methods"] = methods;
    spec.to_string()
}

#[tokio::test]
async fn test_hello_world_full_generation() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let contract = AppSpecParser::new().parse_content(HELLO_ARC56)?;

    let codegen = AlgorandClientCodegen::new(config_for(&temp_dir))?;
    let files = codegen.generate_all(&contract).await?;
    assert_eq!(files.len(), 5);

    for name in ["appspec.go", "types.go", "client.go", "composer.go", "factory.go"] {
        assert!(temp_dir.path().join(name).exists(), "{} should be written", name);
    }

    let appspec = fs::read_to_string(temp_dir.path().join("appspec.go")).unwrap();
    assert!(appspec.contains("package helloworld"));
    assert!(appspec.contains(r#"const AppSpecJSON = "{\"arcs\":[4,56]"#));
    assert!(appspec.contains(r#"\"byteCode\""#), "spec extras should be embedded");

    let types = fs::read_to_string(temp_dir.path().join("types.go")).unwrap();
    assert!(types.contains("type HelloArgs struct {"));
    assert!(types.contains("Name string"));
    assert!(types.contains("type HelloMethodResult struct {"));
    assert!(types.contains("Return string"));
    assert!(types.contains(r#"algokit "github.com/kylebeee/algokit-utils-go""#));
    assert!(types.contains("type FactoryCreateParams struct {"));

    let client = fs::read_to_string(temp_dir.path().join("client.go")).unwrap();
    assert!(client.contains(
        "func (c *Client) SendHello(ctx context.Context, params algokit.CallParams[HelloArgs]) (*HelloMethodResult, error) {"
    ));
    assert!(client.contains(r#"MethodName: "hello(string)string","#));
    assert!(client.contains("OnComplete: types.NoOpOC,"));
    assert!(client.contains("// Says hello"));
    assert!(client.contains(r#""github.com/algorand/go-algorand-sdk/v2/types""#));

    let composer = fs::read_to_string(temp_dir.path().join("composer.go")).unwrap();
    assert!(composer.contains("func (g *Composer) Hello(params algokit.CallParams[HelloArgs]) *Composer {"));

    let factory = fs::read_to_string(temp_dir.path().join("factory.go")).unwrap();
    assert!(factory.contains("func NewFactory(params algokit.AppFactoryParams) (*Factory, error) {"));
    assert!(factory.contains(r#"Method:     "hello(string)string","#));
    assert!(factory.contains("Args:       []interface{}{params.Args.Name},"));
    assert!(client.contains("MethodArgs: []interface{}{params.Args.Name},"));

    Ok(())
}

#[tokio::test]
async fn test_minimal_mode_skips_factory() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let contract = AppSpecParser::new().parse_content(HELLO_ARC56)?;

    let config = AlgorandCodegenConfig {
        mode: GenerationMode::Minimal,
        ..config_for(&temp_dir)
    };
    let files = AlgorandClientCodegen::new(config)?.generate_all(&contract).await?;

    assert_eq!(files.len(), 4);
    assert!(temp_dir.path().join("client.go").exists());
    assert!(!temp_dir.path().join("factory.go").exists());
    Ok(())
}

#[tokio::test]
async fn test_dry_run_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out");
    let contract = AppSpecParser::new().parse_content(HELLO_ARC56)?;

    let config = AlgorandCodegenConfig {
        output_dir: output.to_str().unwrap().to_string(),
        dry_run: true,
        ..Default::default()
    };
    let files = AlgorandClientCodegen::new(config)?.generate_all(&contract).await?;

    assert_eq!(files.len(), 5);
    assert!(!output.exists(), "dry run must not create the output directory");
    Ok(())
}

#[tokio::test]
async fn test_arc32_file_generation() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let spec_path = temp_dir.path().join("calculator.arc32.json");
    fs::write(&spec_path, CALCULATOR_ARC32).unwrap();
    let output = temp_dir.path().join("calc");

    let config = AlgorandCodegenConfig {
        output_dir: output.to_str().unwrap().to_string(),
        package_name: Some("calc".to_string()),
        gofmt: false,
        ..Default::default()
    };
    generate_client_code(spec_path.to_str().unwrap(), config).await?;

    let types = fs::read_to_string(output.join("types.go")).unwrap();
    assert!(types.contains("package calc"));
    assert!(types.contains("type UserInfo struct {"));
    assert!(types.contains("Owner types.Address `json:\"owner\"`"));
    assert!(types.contains("Info UserInfo"));
    assert!(types.contains("Return UserInfo"));
    assert!(types.contains(r#""github.com/algorand/go-algorand-sdk/v2/types""#));
    // create() takes no arguments, so no dedicated create params type
    assert!(!types.contains("FactoryCreateParams"));

    let client = fs::read_to_string(output.join("client.go")).unwrap();
    assert!(client.contains("func (c *Client) SendAdd(ctx context.Context, params algokit.CallParams[AddArgs]) (*AddMethodResult, error) {"));
    assert!(client.contains("func (c *Client) SendCreate(ctx context.Context) error {"));
    assert!(client.contains("func (c *Client) GetGlobalCounter(ctx context.Context) (uint64, error) {"));
    assert!(client.contains("func (c *Client) GetGlobalOwner(ctx context.Context) ([]byte, error) {"));
    assert!(client.contains(r#""Y291bnRlcg==""#));
    assert!(client.contains("func (c *Client) GetLocalPoints(ctx context.Context, address types.Address) (uint64, error) {"));
    assert!(client.contains("func (c *Client) SendBareOptIn(ctx context.Context, params algokit.AppCallSendParams) error {"));
    assert!(client.contains("params.OnComplete = types.OptInOC"));

    let factory = fs::read_to_string(output.join("factory.go")).unwrap();
    assert!(factory.contains("func (f *Factory) Create(ctx context.Context, params algokit.AppFactoryCreateParams)"));
    assert!(factory.contains(r#"params.Method = "create()void""#));

    Ok(())
}

#[tokio::test]
async fn test_preserve_names() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let spec = HELLO_ARC56.replace("\"hello\"", "\"say_hello\"");
    let contract = AppSpecParser::new().parse_content(&spec)?;

    let config = AlgorandCodegenConfig {
        name_policy: NamePolicy::Preserve,
        ..config_for(&temp_dir)
    };
    AlgorandClientCodegen::new(config)?.generate_all(&contract).await?;

    let client = fs::read_to_string(temp_dir.path().join("client.go")).unwrap();
    assert!(client.contains("func (c *Client) SendSay_hello(ctx context.Context"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_package_name_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out");
    let contract = AppSpecParser::new().parse_content(HELLO_ARC56).unwrap();

    let config = AlgorandCodegenConfig {
        output_dir: output.to_str().unwrap().to_string(),
        package_name: Some("Not-A-Package".to_string()),
        ..Default::default()
    };
    let result = AlgorandClientCodegen::new(config).unwrap().generate_all(&contract).await;

    assert!(matches!(result, Err(Error::Config(_))));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_spec_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");
    let result = generate_client_code(missing.to_str().unwrap(), config_for(&temp_dir)).await;
    assert!(matches!(result, Err(Error::Io(_))));
}

#[tokio::test]
async fn test_overloaded_create_is_matched_by_signature() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let spec = hello_with_methods(serde_json::json!([
        {
            "name": "create",
            "args": [{"type": "uint64", "name": "seed"}],
            "returns": {"type": "void"},
            "actions": {"create": [], "call": ["NoOp"]},
            "readonly": false,
            "events": []
        },
        {
            "name": "create",
            "args": [],
            "returns": {"type": "void"},
            "actions": {"create": ["NoOp"], "call": []},
            "readonly": false,
            "events": []
        }
    ]));
    let contract = AppSpecParser::new().parse_content(&spec)?;
    AlgorandClientCodegen::new(config_for(&temp_dir))?.generate_all(&contract).await?;

    let types = fs::read_to_string(temp_dir.path().join("types.go")).unwrap();
    assert!(!types.contains("FactoryCreateParams"));

    let factory = fs::read_to_string(temp_dir.path().join("factory.go")).unwrap();
    assert!(factory.contains(r#"params.Method = "create()void""#));
    assert!(!factory.contains("create(uint64)void"));
    Ok(())
}

#[tokio::test]
async fn test_transaction_only_create_uses_runtime_params() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let spec = hello_with_methods(serde_json::json!([
        {
            "name": "bootstrap",
            "args": [{"type": "pay", "name": "funding"}],
            "returns": {"type": "void"},
            "actions": {"create": ["NoOp"], "call": []},
            "readonly": false,
            "events": []
        }
    ]));
    let contract = AppSpecParser::new().parse_content(&spec)?;
    AlgorandClientCodegen::new(config_for(&temp_dir))?.generate_all(&contract).await?;

    let types = fs::read_to_string(temp_dir.path().join("types.go")).unwrap();
    assert!(types.contains("type BootstrapArgs struct {"));
    assert!(!types.contains("FactoryCreateParams"));

    let factory = fs::read_to_string(temp_dir.path().join("factory.go")).unwrap();
    assert!(factory.contains(
        "func (f *Factory) Create(ctx context.Context, params algokit.AppFactoryCreateParams)"
    ));
    assert!(factory.contains(r#"params.Method = "bootstrap(pay)void""#));
    Ok(())
}
