//! One-shot calls to the RAG chat proxy.

use anyhow::{Result, anyhow, bail};
use tokio::signal;

use denim_config::DenimConfig;
use denim_rag::{ChatOutcome, ChatRequest, RagClient};

fn client(config: Option<&DenimConfig>) -> Result<RagClient> {
    let rag = config.and_then(|c| c.rag.as_ref()).ok_or_else(|| {
        let location = DenimConfig::path()
            .map_or_else(|| "the config file".to_string(), |p| p.display().to_string());
        anyhow!("no [rag] section in {location}")
    })?;
    Ok(RagClient::from_config(rag)?)
}

pub async fn ask(
    config: Option<&DenimConfig>,
    message: String,
    conversation: Option<String>,
) -> Result<()> {
    let client = client(config)?;
    let mut request = ChatRequest::new(message);
    if let Some(id) = conversation {
        request = request.in_conversation(id);
    }

    let outcome = tokio::select! {
        outcome = client.chat(&request) => outcome?,
        _ = signal::ctrl_c() => bail!("interrupted"),
    };

    match outcome {
        ChatOutcome::Reply(reply) => {
            println!("{}", reply.text());
            Ok(())
        }
        ChatOutcome::Failed(response) => bail!(
            "chat proxy returned HTTP {}: {}",
            response.status,
            response.text()
        ),
    }
}

pub async fn conversations(config: Option<&DenimConfig>) -> Result<()> {
    let response = client(config)?.list_conversations().await?;
    if !response.is_success() {
        bail!(
            "chat proxy returned HTTP {}: {}",
            response.status,
            response.text()
        );
    }
    println!("{}", response.text());
    Ok(())
}
