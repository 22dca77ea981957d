use maud::{html, Markup, DOCTYPE};
use poem::http::StatusCode;
use poem::web::cookie::CookieJar;
use poem::web::{Data, Form, Html, Query, Redirect};
use poem::{handler, IntoResponse, Response};
use serde::Deserialize;

use crate::city;
use crate::error::Error;
use crate::ledger::{Ledger, Prediction, Strategy};
use crate::model::Regressor;
use crate::prelude::*;
use crate::property::*;
use crate::web::partials::*;
use crate::web::session::SessionStore;

#[derive(Deserialize)]
pub struct IndexQuery {
    #[serde(default)]
    strategy: Option<Strategy>,
}

/// Result of the latest «predict» action.
enum Outcome {
    Predicted { price: f64, number: usize },
    Failed(Error),
}

#[handler]
#[instrument(level = "info", skip_all)]
pub async fn get(
    Query(query): Query<IndexQuery>,
    jar: &CookieJar,
    Data(sessions): Data<&Arc<SessionStore>>,
) -> Response {
    let ledger = sessions.ledger(jar).await;
    let ledger = ledger.lock().await;
    debug!(?query.strategy, n_predictions = ledger.len());
    Html(render(&PropertyInput::default(), None, &ledger, query.strategy).into_string())
        .into_response()
}

#[handler]
#[instrument(level = "info", skip_all)]
pub async fn post_predict(
    Form(input): Form<PropertyInput>,
    jar: &CookieJar,
    Data(model): Data<&Arc<dyn Regressor>>,
    Data(sessions): Data<&Arc<SessionStore>>,
) -> Response {
    let input = input.clamped();
    let ledger = sessions.ledger(jar).await;
    let mut ledger = ledger.lock().await;

    let (status, outcome) = match Prediction::new(input.clone(), &**model) {
        Ok(prediction) => {
            let price = prediction.price;
            ledger.append(prediction);
            info!(price, n_predictions = ledger.len(), "predicted");
            (StatusCode::OK, Outcome::Predicted { price, number: ledger.len() })
        }
        Err(error) => {
            warn!(?input, "{:#}", error);
            (StatusCode::UNPROCESSABLE_ENTITY, Outcome::Failed(error))
        }
    };

    Html(render(&input, Some(&outcome), &ledger, None).into_string())
        .with_status(status)
        .into_response()
}

#[handler]
#[instrument(level = "info", skip_all)]
pub async fn post_clear(jar: &CookieJar, Data(sessions): Data<&Arc<SessionStore>>) -> Redirect {
    sessions.ledger(jar).await.lock().await.clear();
    Redirect::see_other("/")
}

fn render(
    input: &PropertyInput,
    outcome: Option<&Outcome>,
    ledger: &Ledger,
    strategy: Option<Strategy>,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                (headers())
                title { "Real Estate Price Prediction System" }
            }
            body {
                section.hero.is-accent {
                    div.hero-body.has-text-centered {
                        p.title { "Real Estate Price Prediction System" }
                        p.subtitle { "Get accurate property price predictions using advanced machine learning" }
                    }
                }

                section.section {
                    div.container {
                        div.columns {
                            div.column."is-8" {
                                form method="POST" action="/predict" {
                                    div.columns {
                                        div.column {
                                            p.column-header { "Property Measurements" }
                                            div.box { (measurements(input)) }
                                        }
                                        div.column {
                                            p.column-header { "Property Features" }
                                            div.box { (features(input)) }
                                        }
                                    }
                                    button.button.is-success.is-medium.is-fullwidth type="submit" {
                                        "Predict Property Price"
                                    }
                                }
                                @if let Some(outcome) = outcome {
                                    (render_outcome(outcome))
                                }
                            }
                            aside.column."is-4" {
                                (comparison(ledger, strategy))
                            }
                        }
                    }
                }

                (footer())
            }
        }
    }
}

fn measurements(input: &PropertyInput) -> Markup {
    html! {
        (number_field("Square Feet of Living Space", "sqft_living", *SQFT_LIVING.start(), *SQFT_LIVING.end(), input.sqft_living))
        (number_field("Square Feet of Lot", "sqft_lot", *SQFT_LOT.start(), *SQFT_LOT.end(), input.sqft_lot))
        (number_field("Square Feet Above Ground", "sqft_above", *SQFT_ABOVE.start(), *SQFT_ABOVE.end(), input.sqft_above))
        (number_field("Square Feet of Basement", "sqft_basement", *SQFT_BASEMENT.start(), *SQFT_BASEMENT.end(), input.sqft_basement))
        (number_field("Year Built", "yr_built", *YEAR.start(), *YEAR.end(), input.yr_built))
        (number_field("Year Renovated (0 if never)", "yr_renovated", NOT_RENOVATED, *YEAR.end(), input.yr_renovated))
        (number_field("Price per Square Foot ($)", "price_per_sqft", *PRICE_PER_SQFT.start(), *PRICE_PER_SQFT.end(), input.price_per_sqft))
    }
}

fn features(input: &PropertyInput) -> Markup {
    html! {
        (select_field("Number of Bedrooms", "bedrooms", BEDROOMS, &input.bedrooms))
        (select_field("Number of Bathrooms", "bathrooms", bathroom_options(), &input.bathrooms))
        (select_field("View Rating (0-4)", "view", VIEW, &input.view))
        (select_field("Property Condition (1-5)", "condition", CONDITION, &input.condition))
        (select_field("Number of Floors", "floors", FLOORS, &input.floors))
        (select_field("Select City", "city", city::names().map(|name| -> &str { name }), &input.city.as_str()))
    }
}

fn render_outcome(outcome: &Outcome) -> Markup {
    match outcome {
        Outcome::Predicted { price, number } => html! {
            div.prediction-result {
                p.subtitle { "💰 Predicted Property Price" }
                p.title."is-2" { (Currency(*price)) }
                p { "Based on the selected property features and location" }
                small { "Prediction #" (number) " saved for comparison" }
            }
        },
        Outcome::Failed(error) => html! {
            div.notification.is-danger."mt-5" { (error.to_string()) }
        },
    }
}

fn comparison(ledger: &Ledger, strategy: Option<Strategy>) -> Markup {
    html! {
        div.box {
            p.title."is-5".has-text-centered { "📊 Compare Investment Opportunities" }
            @if ledger.is_empty() {
                div.notification.is-info {
                    "Make some predictions first to compare investment opportunities!"
                }
            } @else {
                p."mb-3" { strong { "Total Predictions Made: " } (ledger.len()) }
                form method="GET" action="/" {
                    label.label for="strategy" { "Choose your investment preference:" }
                    div.field.has-addons {
                        div.control.is-expanded {
                            div.select.is-fullwidth {
                                select id="strategy" name="strategy" {
                                    option disabled selected[strategy.is_none()] { "Select an option" }
                                    @for choice in Strategy::ALL {
                                        option value=(choice.slug()) selected[strategy == Some(choice)] {
                                            (choice.title())
                                        }
                                    }
                                }
                            }
                        }
                        div.control {
                            button.button.is-success type="submit" { "Compare" }
                        }
                    }
                }
                @if let Some(strategy) = strategy {
                    (investment(ledger, strategy))
                }
                hr;
                form method="POST" action="/clear" {
                    button.button.is-danger.is-fullwidth type="submit" { "🗑️ Clear All Predictions" }
                }
            }
        }
    }
}

fn investment(ledger: &Ledger, strategy: Strategy) -> Markup {
    let icon = match strategy {
        Strategy::Minimal => "💰",
        Strategy::High => "🏆",
    };
    match ledger.compare(strategy) {
        Ok(prediction) => html! {
            div.investment {
                p.title."is-6" { (icon) " " (strategy.title()) }
                p.has-text-grey-light { (strategy.description()) }
                p.title."is-4".price { (Currency(prediction.price)) }
            }
            p { strong { "Property Features:" } }
            div.feature-list { (feature_list(prediction)) }
        },
        Err(error) => html! {
            div.notification.is-warning { (error.to_string()) }
        },
    }
}

fn feature_list(prediction: &Prediction) -> Markup {
    let input = &prediction.input;
    html! {
        "bathrooms: " (Float::from(input.bathrooms).precision(1)) "\n"
        "bedrooms: " (input.bedrooms) "\n"
        "sqft_living: " (Thousands(input.sqft_living)) "\n"
        "sqft_lot: " (Thousands(input.sqft_lot)) "\n"
        "floors: " (input.floors) "\n"
        "view: " (input.view) "\n"
        "condition: " (input.condition) "\n"
        "sqft_above: " (Thousands(input.sqft_above)) "\n"
        "sqft_basement: " (Thousands(input.sqft_basement)) "\n"
        "yr_built: " (input.yr_built) "\n"
        "yr_renovated: " (input.yr_renovated) "\n"
        "city: " (input.city) "\n"
        "price_per_sqft: " (Currency(f64::from(prediction.price_per_sqft))) "\n"
        "lot_to_living_ratio: " (Float::from(prediction.lot_to_living_ratio).precision(2))
    }
}
