use dioxus::prelude::*;

mod catalog;
mod components;
mod db;
mod playback;
mod utils;

use components::AppView;

const FAVICON: Asset = asset!("/assets/favicon.svg");
const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    dioxus::logger::initialize_default();
    tracing::info!(episodes = catalog::all_episodes().len(), "starting podplayer");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Meta { name: "theme-color", content: "#1f2a44" }
        document::Meta { name: "apple-mobile-web-app-title", content: "podplayer" }
        document::Stylesheet { href: APP_CSS }

        Router::<AppView> {}
    }
}
