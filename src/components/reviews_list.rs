use leptos::*;
use crate::models::review::ReviewSummary;

/// Renders reviews newest first. With `on_delete`, each entry gets a delete
/// button that passes the review id.
#[component]
pub fn ReviewsList(
    #[prop(into)] reviews: Signal<Vec<ReviewSummary>>,
    #[prop(optional)] on_delete: Option<Callback<String>>,
) -> impl IntoView {
    view! {
        <div class="reviews-list">
            <Show
                when=move || reviews.with(|r| !r.is_empty())
                fallback=|| view! { <p>{ "No reviews yet." }</p> }
            >
                <For
                    each=move || reviews.get()
                    key=|review| review.id.clone()
                    children=move |review| {
                        let id = review.id.clone();
                        view! {
                            <div class="review-card">
                                <h4>{ review.name }</h4>
                                <p>{ format!("\"{}\"", review.comment) }</p>
                                { review.audio.map(|src| view! { <audio src=src controls=true /> }) }
                                { on_delete.map(|on_delete| view! {
                                    <button class="danger" on:click=move |_| on_delete.call(id.clone())>
                                        { "Delete" }
                                    </button>
                                }) }
                            </div>
                        }
                    }
                />
            </Show>
        </div>
    }
}
