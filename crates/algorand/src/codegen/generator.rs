//! Go client generator
//!
//! Builds the generation context for a contract, renders the package files
//! from templates and writes them to the output directory.

use super::templates::AlgorandTemplateManager;
use super::AlgorandCodegenConfig;
use appclient_common::{Error, Result};
use appclient_core::arc56::Arc56Contract;
use appclient_core::call_config::OnCompletionAction;
use appclient_core::context::{ArgDescriptor, GenerationContext, MethodDescriptor};
use appclient_core::type_mapping::{sort_imports, IMPORT_ALGOKIT, IMPORT_SDK_TYPES};
use appclient_core::{build_context, GenerationConfig};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Import path for `context.Context`
const IMPORT_CONTEXT: &str = "context";

/// Per-method view consumed by the templates
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateMethod<'a> {
    name: &'a str,
    original_name: &'a str,
    signature: &'a str,
    selector: &'a str,
    desc: Option<&'a str>,
    args: &'a [ArgDescriptor],
    has_args: bool,
    has_non_void_return: bool,
    return_type: String,
    args_struct_name: String,
    result_struct_name: String,
    readonly: bool,
    on_complete: &'static str,
}

impl<'a> TemplateMethod<'a> {
    fn new(method: &'a MethodDescriptor) -> Self {
        Self {
            name: &method.name,
            original_name: &method.original_name,
            signature: &method.signature,
            selector: &method.selector,
            desc: method.desc.as_deref(),
            args: &method.args,
            has_args: method.has_args(),
            has_non_void_return: method.has_non_void_return(),
            return_type: method.returns.go_type(),
            args_struct_name: method.args_struct_name(),
            result_struct_name: method.result_struct_name(),
            readonly: method.call_config.is_readonly,
            on_complete: method
                .call_config
                .call_actions()
                .first()
                .map(on_complete_constant)
                .unwrap_or("types.NoOpOC"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateBareAction {
    tag: &'static str,
    on_complete: &'static str,
}

/// Go SDK constant for an on-completion action
fn on_complete_constant(action: &OnCompletionAction) -> &'static str {
    match action {
        OnCompletionAction::NoOp => "types.NoOpOC",
        OnCompletionAction::OptIn => "types.OptInOC",
        OnCompletionAction::CloseOut => "types.CloseOutOC",
        OnCompletionAction::UpdateApplication => "types.UpdateApplicationOC",
        OnCompletionAction::DeleteApplication => "types.DeleteApplicationOC",
    }
}

/// Go import line for a path; the runtime library is aliased
fn import_line(path: &str) -> String {
    if path == IMPORT_ALGOKIT {
        format!("algokit \"{}\"", path)
    } else {
        format!("\"{}\"", path)
    }
}

/// Code generator for Go application clients
pub struct AlgorandClientCodegen {
    config: AlgorandCodegenConfig,
    templates: AlgorandTemplateManager,
}

impl AlgorandClientCodegen {
    /// Create a new code generator with the given configuration
    pub fn new(config: AlgorandCodegenConfig) -> Result<Self> {
        Ok(Self {
            config,
            templates: AlgorandTemplateManager::new()?,
        })
    }

    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::new(
            self.config.package_name.clone(),
            self.config.mode,
            self.config.name_policy,
        )
    }

    /// Generate every file of the client package
    pub async fn generate_all(&self, contract: &Arc56Contract) -> Result<Vec<PathBuf>> {
        let generation = self.generation_config();
        generation.validate()?;

        let ctx = build_context(contract, &generation);
        for collision in &ctx.collisions {
            warn!(
                "Generated identifier '{}' in scope '{}' is produced by {}",
                collision.identifier,
                collision.scope,
                collision.sources.join(", ")
            );
        }

        let output_dir = Path::new(&self.config.output_dir);
        if !self.config.dry_run {
            tokio::fs::create_dir_all(output_dir)
                .await
                .map_err(|e| Error::io(format!("Failed to create output directory: {}", e)))?;
        }

        info!(
            "Generating Go client for {} (package {}, {} methods)",
            ctx.original_name,
            ctx.package_name,
            ctx.methods.len()
        );

        let data = self.template_data(contract, &ctx)?;
        let mut files = vec![
            ("appspec.go", "appspec"),
            ("types.go", "types"),
            ("client.go", "client"),
            ("composer.go", "composer"),
        ];
        if ctx.has_factory {
            files.push(("factory.go", "factory"));
        }

        let mut written = Vec::with_capacity(files.len());
        for (file_name, template) in files {
            let content = self.templates.render(template, &data)?;
            let path = output_dir.join(file_name);
            self.write_file(&path, &content).await?;
            written.push(path);
        }

        if self.config.gofmt && !self.config.dry_run {
            self.run_gofmt(output_dir).await?;
        }

        Ok(written)
    }

    /// Assemble the JSON document handed to every template
    fn template_data(&self, contract: &Arc56Contract, ctx: &GenerationContext) -> Result<Value> {
        let spec_json = serde_json::to_string(contract)?;
        // A JSON string literal is also a valid Go interpreted string literal
        let app_spec_json = serde_json::to_string(&spec_json)?;

        let methods: Vec<TemplateMethod> = ctx.methods.iter().map(TemplateMethod::new).collect();
        // Overloads share a name, so the create method is matched by signature
        let create = ctx
            .create_method
            .as_ref()
            .and_then(|create| ctx.methods.iter().find(|m| m.signature == create.signature));
        let has_create_with_args = ctx.create_method.as_ref().map_or(false, |c| c.has_args);
        let create_method_args: &[ArgDescriptor] =
            create.map(|m| m.args.as_slice()).unwrap_or(&[]);

        let bare_actions: Vec<TemplateBareAction> = ctx
            .bare_config
            .call_actions()
            .iter()
            .map(|action| TemplateBareAction {
                tag: action.tag(),
                on_complete: on_complete_constant(action),
            })
            .collect();

        let types_imports: Vec<String> = self
            .types_imports(ctx, has_create_with_args)
            .iter()
            .map(|p| import_line(p))
            .collect();
        let client_imports: Vec<String> =
            self.client_imports(ctx).iter().map(|p| import_line(p)).collect();
        debug!("types.go imports: {:?}", types_imports);
        debug!("client.go imports: {:?}", client_imports);

        let data = serde_json::json!({
            "packageName": ctx.package_name,
            "contractName": ctx.contract_name,
            "originalName": ctx.original_name,
            "description": ctx.description,
            "appSpecJson": app_spec_json,
            "methods": methods,
            "structs": ctx.structs,
            "state": ctx.state,
            "bareConfig": ctx.bare_config,
            "bareCallActions": bare_actions,
            "hasFactory": ctx.has_factory,
            "createMethod": ctx.create_method,
            "createMethodArgs": create_method_args,
            "hasMethodCreateWithArgs": has_create_with_args,
            "typesImports": types_imports,
            "clientImports": client_imports,
        });
        Ok(data)
    }

    /// Imports of types.go: struct fields, method arguments and non-void returns
    pub(crate) fn types_imports(
        &self,
        ctx: &GenerationContext,
        has_create_with_args: bool,
    ) -> Vec<String> {
        let mut imports = BTreeSet::new();
        for field in ctx.structs.iter().flat_map(|s| &s.fields) {
            imports.extend(field.mapping.imports.iter().cloned());
        }
        for method in &ctx.methods {
            for arg in &method.args {
                imports.extend(arg.mapping.imports.iter().cloned());
            }
            if method.has_non_void_return() {
                imports.extend(method.returns.imports.iter().cloned());
            }
        }

        let any_return = ctx.methods.iter().any(|m| m.has_non_void_return());
        if any_return || has_create_with_args {
            imports.insert(IMPORT_ALGOKIT.to_string());
        }
        sort_imports(&imports)
    }

    /// Imports of client.go: runtime, SDK types and state accessor types
    pub(crate) fn client_imports(&self, ctx: &GenerationContext) -> Vec<String> {
        let mut imports = ctx.state.imports();
        imports.insert(IMPORT_CONTEXT.to_string());
        imports.insert(IMPORT_ALGOKIT.to_string());
        imports.insert(IMPORT_SDK_TYPES.to_string());
        sort_imports(&imports)
    }

    async fn write_file(&self, path: &PathBuf, content: &str) -> Result<()> {
        if self.config.dry_run {
            println!("\n--- {} ---", path.display());
            println!("{}", content);
        } else {
            tokio::fs::write(path, content)
                .await
                .map_err(|e| Error::io(format!("Failed to write file {}: {}", path.display(), e)))?;
            debug!("Wrote {}", path.display());
        }
        Ok(())
    }

    /// Run `gofmt -w` over the output directory
    async fn run_gofmt(&self, output_dir: &Path) -> Result<()> {
        let output = match tokio::process::Command::new("gofmt")
            .arg("-w")
            .arg(output_dir)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("gofmt not found on PATH, generated files left unformatted");
                return Ok(());
            }
            Err(e) => return Err(Error::io(format!("Failed to run gofmt: {}", e))),
        };

        if !output.status.success() {
            return Err(Error::generic(format!(
                "gofmt failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        debug!("Formatted {}", output_dir.display());
        Ok(())
    }
}
