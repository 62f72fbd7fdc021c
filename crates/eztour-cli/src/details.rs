//! `details` subcommand handler.

use anyhow::Context;
use eztour_core::AppConfig;
use eztour_places::{PlaceDetails, PlacesClient};

use crate::search::truncate;

/// Fetch and print the detail record for `place_id`, with at most
/// `max_reviews` reviews.
///
/// # Errors
///
/// Returns an error if the API key is missing or the provider request fails,
/// including when the place id is unknown.
pub(crate) async fn run_details(
    config: &AppConfig,
    place_id: &str,
    max_reviews: usize,
) -> anyhow::Result<()> {
    let client =
        PlacesClient::from_app_config(config).context("cannot create the places client")?;
    let details = client
        .place_details(place_id)
        .await
        .with_context(|| format!("failed to fetch details for '{place_id}'"))?;

    print_details(&details, max_reviews);
    Ok(())
}

fn print_details(details: &PlaceDetails, max_reviews: usize) {
    println!("{}", details.name);

    let fields = [
        ("address", details.formatted_address.as_deref()),
        ("phone", details.formatted_phone_number.as_deref()),
        ("website", details.website.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {label:<10}{value}");
        }
    }
    if let Some(rating) = details.rating {
        println!("  {:<10}{rating:.1}", "rating");
    }

    if let Some(hours) = &details.opening_hours {
        match hours.open_now {
            Some(true) => println!("  {:<10}open now", "hours"),
            Some(false) => println!("  {:<10}closed now", "hours"),
            None => {}
        }
        for line in &hours.weekday_text {
            println!("    {line}");
        }
    }

    if !details.photos.is_empty() {
        println!("  {:<10}{}", "photos", details.photos.len());
    }

    if max_reviews > 0 && !details.reviews.is_empty() {
        println!("  reviews:");
        for review in details.reviews.iter().take(max_reviews) {
            let when = review.relative_time_description.as_deref().unwrap_or("");
            println!("    {:.0}/5 {} {when}", review.rating, review.author_name);
            if !review.text.is_empty() {
                println!("      {}", truncate(&review.text, 96));
            }
        }
    }
}
