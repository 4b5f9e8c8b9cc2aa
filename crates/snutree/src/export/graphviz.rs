//! Rendering through the external Graphviz `dot` program.

use graphviz_rust::cmd::{CommandArg, Format};
use log::{debug, info};

use crate::export::Error;

/// Maps an output file extension to a Graphviz output format.
pub fn output_format(extension: &str) -> Option<Format> {
    let format = match extension.to_ascii_lowercase().as_str() {
        "bmp" => Format::Bmp,
        "eps" => Format::Eps,
        "gif" => Format::Gif,
        "jpg" | "jpeg" => Format::Jpg,
        "json" => Format::Json,
        "pdf" => Format::Pdf,
        "plain" => Format::Plain,
        "png" => Format::Png,
        "ps" => Format::Ps,
        "svg" => Format::Svg,
        "tif" | "tiff" => Format::Tiff,
        "webp" => Format::Webp,
        _ => return None,
    };
    Some(format)
}

/// Pipes DOT `source` through `dot` and returns the rendered output.
///
/// # Errors
///
/// Returns [`Error::Render`] for an extension Graphviz has no format for,
/// and [`Error::Io`] when `dot` cannot be run or fails.
pub fn render(source: &str, extension: &str) -> Result<Vec<u8>, Error> {
    let format = output_format(extension)
        .ok_or_else(|| Error::Render(format!("unsupported output format `{extension}`")))?;
    info!(format:?; "Running Graphviz");

    let output = graphviz_rust::exec_dot(source.to_string(), vec![CommandArg::Format(format)])?;

    debug!(bytes = output.len(); "Graphviz finished");
    Ok(output)
}
