//! CLI command: `tokentally chat`

use super::{ctrl_c_token, print_report, ChatArgs};
use anyhow::Context;
use std::io::Write;
use tokentally_llm::{AiGateway, ChatChunk, ChatRequest, Message};
use tokio::sync::mpsc;

/// Capacity of the chunk channel between the gateway and the printer
const STREAM_BUFFER: usize = 32;

/// Run the chat subcommand.
pub async fn run(gateway: &AiGateway, args: ChatArgs) -> anyhow::Result<()> {
    let mut request = ChatRequest::new(args.model.unwrap_or_default());
    if let Some(system) = args.system {
        request = request.with_message(Message::system(system));
    }
    request = request.with_message(Message::user(args.prompt));

    let cancel = ctrl_c_token();

    if args.stream {
        let (tx, mut rx) = mpsc::channel::<ChatChunk>(STREAM_BUFFER);
        let printer = tokio::spawn(async move {
            let mut stdout = std::io::stdout();
            while let Some(chunk) = rx.recv().await {
                for choice in chunk.choices.iter().filter(|c| c.index == 0) {
                    if let Some(content) = &choice.delta.content {
                        let _ = write!(stdout, "{content}");
                        let _ = stdout.flush();
                    }
                }
            }
            println!();
        });

        let result = gateway.chat_completion_stream(request, tx, &cancel).await;
        printer.await.context("stream printer panicked")?;
        result?;
    } else {
        let response = gateway.create_chat_completion(request, &cancel).await?;
        println!("{}", response.content().unwrap_or_default());
    }

    print_report(gateway).await;
    Ok(())
}
