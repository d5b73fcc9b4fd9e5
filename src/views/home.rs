use crate::models::message::PastorMessage;
use crate::services::pastor_messages::PastorMessageApi;
use crate::views::render::Page;

pub const HEADING: &str = "Message from the Pastor";
pub const LOADING_TEXT: &str = "Loading message...";

/// Shown whenever there is no active message to display, for whatever reason.
pub const FALLBACK_TEXT: &str = "Lorem ipsum dolor sit amet consectetur adipisicing elit. Provident \
odit impedit ratione dolore. Deserunt deleniti minus nostrum, voluptatibus magnam nesciunt \
temporibus. Necessitatibus facere animi vel in veniam nostrum nam tempora hic molestias possimus \
culpa tenetur assumenda, quidem, repellat sit officia iste, ullam adipisci sapiente similique amet! \
Minima omnis numquam corporis placeat. Sunt tempora illo maiores voluptatibus fugit dicta atque \
nostrum molestias. Autem, totam quod, ratione doloribus nihil aspernatur voluptatibus repellat \
aliquid, odio dolorum natus et quos. Aut, mollitia quibusdam maiores ipsam ipsa veniam eum ipsum \
repudiandae reprehenderit iste aspernatur et quia commodi at numquam voluptatem adipisci. Dolor \
corporis pariatur architecto?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeState {
    Loading,
    Loaded(Option<PastorMessage>),
}

/// Public, read-only display of the active pastor message.
#[derive(Debug, Clone)]
pub struct HomeView {
    state: HomeState,
}

impl Default for HomeView {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeView {
    /// A view that has not fetched yet; renders the loading text.
    pub fn new() -> Self {
        Self {
            state: HomeState::Loading,
        }
    }

    /// Create and load in one step.
    pub async fn mount(api: &PastorMessageApi) -> Self {
        let mut view = Self::new();
        view.load(api).await;
        view
    }

    /// Fetch the active message. Never fails: a missing message and an
    /// unreachable backend both end in the fallback state. Only the first call
    /// fetches; a loaded view keeps what it has.
    pub async fn load(&mut self, api: &PastorMessageApi) {
        if self.state != HomeState::Loading {
            return;
        }
        let active = match api.active().await {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("Error fetching pastor message: {}", e);
                None
            }
        };
        self.state = HomeState::Loaded(active);
    }

    pub fn state(&self) -> &HomeState {
        &self.state
    }

    pub fn message(&self) -> Option<&PastorMessage> {
        match &self.state {
            HomeState::Loaded(m) => m.as_ref(),
            HomeState::Loading => None,
        }
    }

    pub fn render(&self) -> Page {
        let mut page = Page::new();
        page.heading(2, HEADING);
        match &self.state {
            HomeState::Loading => {
                page.paragraph(LOADING_TEXT);
            }
            HomeState::Loaded(Some(m)) => {
                page.heading(3, m.title.as_str()).paragraph(m.message.as_str());
            }
            HomeState::Loaded(None) => {
                page.paragraph(FALLBACK_TEXT);
            }
        }
        page
    }
}
