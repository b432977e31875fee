use crate::config::Config;
use crate::error::LoadError;
use crate::fetch::Fetch;
use crate::models::{RatingsDataset, SourceFormat};
use crate::normalize::{AllowList, NormalizeContext};
use crate::source::source_for;

/// Load the ratings snapshot.
///
/// The allow-list is fetched first and its failure is fatal. Then the
/// preferred format for the fetcher's location is tried; if it fails for any
/// reason the other format is tried once. Only a failure of both is returned.
pub async fn load<F: Fetch>(fetcher: &F, config: &Config) -> Result<RatingsDataset, LoadError> {
    let allow_bytes = fetcher.fetch(&config.data.universities).await?;
    let allow_list = AllowList::from_json(&allow_bytes)?;
    if allow_list.is_empty() {
        tracing::warn!("allow-list is empty; every month will be empty");
    }
    tracing::debug!(universities = allow_list.len(), "allow-list loaded");

    let ctx = NormalizeContext::new(config, &allow_list);
    let preferred = SourceFormat::preferred(fetcher.is_local());

    let first = match load_format(fetcher, preferred, &ctx).await {
        Ok(dataset) => return Ok(dataset),
        Err(err) => err,
    };
    tracing::warn!(
        format = %preferred,
        error = %first,
        "falling back to {}",
        preferred.alternate()
    );

    load_format(fetcher, preferred.alternate(), &ctx)
        .await
        .map_err(|second| LoadError::AllFormatsFailed {
            preferred,
            first: Box::new(first),
            second: Box::new(second),
        })
}

async fn load_format<F: Fetch>(
    fetcher: &F,
    format: SourceFormat,
    ctx: &NormalizeContext<'_>,
) -> Result<RatingsDataset, LoadError> {
    let path = match format {
        SourceFormat::Workbook => &ctx.config.data.ratings_xlsx,
        SourceFormat::Json => &ctx.config.data.ratings_json,
    };
    let source = source_for(format);
    let raw = fetcher.fetch(path).await?;
    let dataset = source.parse(&raw, ctx)?;
    tracing::debug!(format = %source.format(), months = dataset.months.len(), "ratings loaded");
    Ok(dataset)
}
