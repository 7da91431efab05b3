//! Pipeline driver: request echo in, PDF bytes out

use crate::config::RenderConfig;
use crate::echo::RequestEcho;
use crate::error::Result;
use crate::pdf::{DocTemplate, NumberedPages};
use crate::story;

/// Render the echo document for one request
///
/// Story and page numbering state are created per call; only `config` is shared.
pub fn render(config: &RenderConfig, request: &RequestEcho) -> Result<Vec<u8>> {
    let story = story::assemble(request);
    let numbering = NumberedPages::new(config.styles.footer, config.footer_baseline());
    DocTemplate::new(config).build(&story, numbering)
}
