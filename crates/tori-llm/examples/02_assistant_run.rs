use anyhow::Result;
use std::time::Duration;
use tori_llm::{AssistantClient, Message, OpenAIClient, RunRequest};

#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("OPENAI_API_KEY")?;
    let assistant_id = std::env::var("OPENAI_ASSISTANT_ID")?;
    let client = OpenAIClient::new(api_key)?;

    let thread_id = client
        .create_thread(vec![Message::human("안녕, 오늘 이야기 좀 들어줄래?")])
        .await?;
    println!("Thread: {}", thread_id);

    let mut run = client
        .create_run(&thread_id, RunRequest::new(assistant_id))
        .await?;

    while run.status.is_active() {
        tokio::time::sleep(Duration::from_millis(500)).await;
        run = client.get_run(&thread_id, &run.id).await?;
        println!("Run status: {}", run.status);
    }

    if run.status.is_completed() {
        if let Some(latest) = client.list_messages(&thread_id, 1).await?.first() {
            println!("Assistant: {}", latest.text());
        }
    }

    Ok(())
}
