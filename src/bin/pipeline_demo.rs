//! Demo that runs the whole pipeline end to end over the canned corpus and
//! prints every intermediate payload as pretty JSON.

use newsroom_pipeline::config::PipelineConfig;
use newsroom_pipeline::llm::build_client;
use newsroom_pipeline::pipeline::{
    compiler, deliverer, disambiguator, entities, fact_checker, fetcher, passages, ranker,
    summarizer, tagger,
};
use newsroom_pipeline::profile;
use newsroom_pipeline::types::Claim;

fn show<T: serde::Serialize>(label: &str, value: &T) {
    println!("\n=== {label} ===");
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "<unserializable>".to_string())
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = PipelineConfig::from_env();
    let llm = build_client(&config);
    println!("llm provider: {}", llm.provider_name());

    let fetched = fetcher::fetch_articles("sample", None, None).await?;
    show("articles", &fetched);

    let mut all_passages = Vec::new();
    for article in &fetched.articles {
        all_passages.extend(passages::extract_passages(&article.id, &article.content));
    }
    show("passages", &all_passages);

    let raw = entities::extract_entities(&all_passages, llm.as_ref()).await;
    show("raw entities", &raw);

    let resolved = disambiguator::disambiguate_entities(&raw);
    show("resolved entities", &resolved);

    let tagged = tagger::tag_entities(resolved);
    show("tagged entities", &tagged);

    let summaries = summarizer::summarize_tags(&tagged, &all_passages, llm.as_ref()).await?;
    show("tag summaries", &summaries);

    let claims = vec![
        Claim {
            text: "OpenAI released a newsroom automation toolkit".to_string(),
            article_id: fetched.articles[0].id.clone(),
        },
        Claim {
            text: "The moon is made of recycled newsprint".to_string(),
            article_id: String::new(),
        },
    ];
    let verdicts = fact_checker::fact_check(claims);
    show("fact checks", &verdicts);

    let reader = profile::get_user_profile("demo-user");
    show("profile", &reader);

    let ranked = ranker::rank_stories(&reader, &summaries, &fetched.articles)?;
    show("ranked stories", &ranked);

    let digest = compiler::compile_digest(&ranked, "markdown")?;
    show("digest", &digest);

    let receipt = deliverer::deliver_digest(&digest, "email", &reader.user_id)?;
    show("delivery receipt", &receipt);

    println!("\npipeline-demo done");
    Ok(())
}
