//! Snutree CLI library
//!
//! This module contains the core CLI logic for the snutree family tree tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, SchemaName};
pub use error_adapter::ErrorAdapter;

use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};

use log::{debug, info};

use snutree::{FamilyTree, Format, SnutreeError, TreeBuilder, schema::Schema};

use config::{AppConfig, ConfigError};

/// Run the snutree CLI application
///
/// This function reads every input directory, builds one family tree from
/// all of their members and writes it to the output file. A `.dot` output
/// (or one without an extension) receives DOT source; any other extension
/// is passed to Graphviz as the output format.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SnutreeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed directories or members
/// - Tree invariant violations
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), SnutreeError> {
    info!(
        inputs:? = args.inputs,
        output_path = args.output;
        "Processing directories"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let schema = resolve_schema(args, &app_config)?;

    let mut tree_config = app_config.tree().clone();
    if let Some(seed) = args.seed {
        tree_config = tree_config.with_seed(seed);
    }

    let mut rows = Vec::new();
    for input in &args.inputs {
        let format = Format::from_path(input)?;
        let source = fs::read_to_string(input)?;
        let read = snutree_reader::read_rows(&source, format)?;
        debug!(input, rows = read.len(); "Read directory");
        rows.extend(read);
    }

    let members = schema.members_from_rows(&rows)?;
    let builder = TreeBuilder::new(tree_config);
    let tree = builder.build(members)?;

    let output = Path::new(&args.output);
    match output.extension().and_then(|ext| ext.to_str()) {
        None | Some("dot") => {
            let file = BufWriter::new(File::create(output)?);
            builder.write_dot(&tree, file)?;
        }
        Some(extension) => write_image(&builder, &tree, extension, output)?,
    }

    info!(output_file = args.output; "Family tree exported successfully");

    Ok(())
}

#[cfg(feature = "graphviz")]
fn write_image(
    builder: &TreeBuilder,
    tree: &FamilyTree,
    extension: &str,
    output: &Path,
) -> Result<(), SnutreeError> {
    let image = builder.render_image(tree, extension)?;
    fs::write(output, image)?;
    Ok(())
}

#[cfg(not(feature = "graphviz"))]
fn write_image(
    _builder: &TreeBuilder,
    _tree: &FamilyTree,
    extension: &str,
    _output: &Path,
) -> Result<(), SnutreeError> {
    Err(ConfigError::Validation(format!(
        "`.{extension}` output needs the `graphviz` feature; write `.dot` instead"
    ))
    .into())
}

/// Picks the schema from the arguments, then the configuration file, then
/// `basic`.
fn resolve_schema(args: &Args, config: &AppConfig) -> Result<Schema, SnutreeError> {
    let name = args
        .schema
        .or(config.schema().name())
        .unwrap_or(SchemaName::Basic);
    debug!(schema:? = name; "Resolved schema");

    let schema = match name {
        SchemaName::Basic => Schema::Basic,
        SchemaName::Keyed => Schema::Keyed,
        SchemaName::Chapter => Schema::Chapter,
        SchemaName::Sigmanu => {
            let chapter = args
                .chapter
                .as_deref()
                .or(config.schema().chapter())
                .ok_or_else(|| {
                    ConfigError::Validation("the sigmanu schema needs a chapter".to_string())
                })?;
            Schema::sigma_nu(chapter)?
        }
    };
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(schema: Option<SchemaName>, chapter: Option<&str>) -> Args {
        Args {
            inputs: vec!["members.csv".to_string()],
            output: "out.dot".to_string(),
            config: None,
            schema,
            chapter: chapter.map(str::to_string),
            seed: None,
            log_level: "off".to_string(),
        }
    }

    #[test]
    fn test_schema_defaults_to_basic() {
        let schema = resolve_schema(&args(None, None), &AppConfig::default()).unwrap();
        assert_eq!(schema, Schema::Basic);
    }

    #[test]
    fn test_sigmanu_needs_chapter() {
        let err = resolve_schema(&args(Some(SchemaName::Sigmanu), None), &AppConfig::default())
            .unwrap_err();
        assert!(matches!(err, SnutreeError::Config(_)), "{err:?}");

        let schema = resolve_schema(
            &args(Some(SchemaName::Sigmanu), Some("Delta Alpha")),
            &AppConfig::default(),
        )
        .unwrap();
        assert!(matches!(schema, Schema::SigmaNu { .. }));
    }
}
