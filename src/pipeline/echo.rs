use crate::http::connection::Transport;
use crate::pipeline::{KnownRequestHeader, KnownResponseHeader, Pipeline, PipelineAdapter};

/// Demo pipeline: answers every request with a plain-text description of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoPipeline;

impl Pipeline for EchoPipeline {
    async fn process_request<S: Transport>(
        &self,
        adapter: &mut PipelineAdapter<'_, S>,
    ) -> anyhow::Result<()> {
        adapter.send_status(200, "OK");
        adapter.send_known_response_header(KnownResponseHeader::ContentType, "text/plain");

        let head = format!(
            "{} {}\nquery: {}\nhost: {}\n",
            adapter.http_verb_name(),
            adapter.file_path(),
            adapter.query_string().unwrap_or(""),
            adapter
                .known_request_header(KnownRequestHeader::Host)
                .unwrap_or(""),
        );
        adapter.send_response_from_memory(head.as_bytes());
        adapter.flush_response(false).await?;

        if let Some(body) = adapter.preloaded_entity_body().map(<[u8]>::to_vec) {
            adapter.send_response_from_memory(b"body: ");
            adapter.send_response_from_memory(&body);
        }
        adapter.flush_response(true).await?;

        Ok(())
    }
}
