//! Create/edit memory form
//!
//! One form for both modes: without an id it creates and prepends the new
//! memory to the global feed cache; with an id it loads the memory, submits
//! the changed fields, and applies the authoritative response everywhere.

use memories_types::{CreateMemoryRequest, UpdateMemoryRequest};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::{ErrorBanner, Header};
use crate::state::{FeedAction, FeedHandle};
use crate::{api, Route};

#[derive(Properties, PartialEq)]
pub struct MemoryFormProps {
    /// Edit the memory with this id; `None` creates a new one.
    pub memory_id: Option<String>,
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[function_component(MemoryFormPage)]
pub fn memory_form_page(props: &MemoryFormProps) -> Html {
    let feed = use_context::<FeedHandle>().expect("MemoryFormPage rendered without feed context");
    let navigator = use_navigator().expect("MemoryFormPage rendered outside a router");

    let title = use_state(String::new);
    let description = use_state(String::new);
    let image = use_state(String::new);
    let tags = use_state(String::new);
    let error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let editing = props.memory_id.is_some();

    // Prefill when editing
    {
        let title = title.clone();
        let description = description.clone();
        let image = image.clone();
        let tags = tags.clone();
        let error = error.clone();
        use_effect_with(props.memory_id.clone(), move |memory_id| {
            if let Some(id) = memory_id.clone() {
                wasm_bindgen_futures::spawn_local(async move {
                    match api::get_memory(&id).await {
                        Ok(memory) => {
                            title.set(memory.title);
                            description.set(memory.description);
                            image.set(memory.image.unwrap_or_default());
                            tags.set(memory.tags.join(", "));
                        }
                        Err(err) => error.set(Some(err.message)),
                    }
                });
            }
            || ()
        });
    }

    let on_title = {
        let title = title.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            title.set(input.value());
        })
    };
    let on_description = {
        let description = description.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            description.set(input.value());
        })
    };
    let on_image = {
        let image = image.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            image.set(input.value());
        })
    };
    let on_tags = {
        let tags = tags.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            tags.set(input.value());
        })
    };

    let on_submit = {
        let feed = feed.clone();
        let navigator = navigator.clone();
        let memory_id = props.memory_id.clone();
        let title = title.clone();
        let description = description.clone();
        let image = image.clone();
        let tags = tags.clone();
        let error = error.clone();
        let saving = saving.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            saving.set(true);
            error.set(None);

            let feed = feed.clone();
            let navigator = navigator.clone();
            let memory_id = memory_id.clone();
            let error = error.clone();
            let saving = saving.clone();
            let title_value = (*title).clone();
            let description_value = (*description).clone();
            let image_value = (*image).clone();
            let tags_value = parse_tags(&tags);

            wasm_bindgen_futures::spawn_local(async move {
                let image_value = if image_value.trim().is_empty() {
                    None
                } else {
                    Some(image_value)
                };

                let result = match &memory_id {
                    Some(id) => {
                        let req = UpdateMemoryRequest {
                            title: Some(title_value),
                            description: Some(description_value),
                            image: image_value,
                            tags: Some(tags_value),
                        };
                        api::update_memory(id, &req).await.map(|memory| {
                            feed.dispatch(FeedAction::Updated(memory.clone()));
                            memory
                        })
                    }
                    None => {
                        let req = CreateMemoryRequest {
                            title: title_value,
                            description: description_value,
                            image: image_value,
                            tags: tags_value,
                        };
                        api::create_memory(&req).await.map(|memory| {
                            feed.dispatch(FeedAction::Created(memory.clone()));
                            memory
                        })
                    }
                };

                match result {
                    Ok(memory) => {
                        navigator.push(&Route::MemoryDetail { id: memory.id });
                    }
                    Err(err) => {
                        error.set(Some(err.message));
                        saving.set(false);
                    }
                }
            });
        })
    };

    let on_dismiss = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    let heading = if editing {
        "Edit Memory"
    } else {
        "Create Memory"
    };

    html! {
        <div class="page">
            <Header />
            <main class="memory-form">
                <h1>{ heading }</h1>

                if let Some(message) = (*error).clone() {
                    <ErrorBanner {message} on_dismiss={on_dismiss.clone()} />
                }

                <form onsubmit={on_submit}>
                    <div class="form-group">
                        <label>{ "Title" }</label>
                        <input
                            type="text"
                            placeholder="Give your memory a title"
                            value={(*title).clone()}
                            oninput={on_title}
                            disabled={*saving}
                            required={true}
                        />
                    </div>

                    <div class="form-group">
                        <label>{ "Description" }</label>
                        <textarea
                            placeholder="Tell the story"
                            value={(*description).clone()}
                            oninput={on_description}
                            disabled={*saving}
                            required={true}
                        />
                    </div>

                    <div class="form-group">
                        <label>{ "Image URL" }</label>
                        <input
                            type="url"
                            placeholder="https://..."
                            value={(*image).clone()}
                            oninput={on_image}
                            disabled={*saving}
                        />
                    </div>

                    <div class="form-group">
                        <label>{ "Tags" }</label>
                        <input
                            type="text"
                            placeholder="travel, beach, summer"
                            value={(*tags).clone()}
                            oninput={on_tags}
                            disabled={*saving}
                        />
                    </div>

                    <button type="submit" class="btn-primary" disabled={*saving}>
                        { if *saving { "Saving..." } else { "Save Memory" } }
                    </button>
                </form>
            </main>
        </div>
    }
}
