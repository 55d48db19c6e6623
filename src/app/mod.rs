use std::collections::HashMap;
use std::rc::Rc;

use eframe::egui::{self, Context};
use settings_forge::accordion::AccordionState;
use settings_forge::adapter::{self, PresentationAdapter};
use settings_forge::compiler::{CompileOptions, CompiledPage, CompiledSchema, Compiler};
use settings_forge::demo::DemoSettings;
use settings_forge::error::CompileError;
use settings_forge::schema::Tree;
use settings_forge::visualizer::{HandleId, RenderHandle};

mod ui;

pub struct SettingsApp {
    options: CompileOptions,
    initial_page: String,
    initial_search: Option<String>,
    state: AppState,
}

enum AppState {
    Ready(Box<ViewModel>),
    Error(String),
}

/// What the central panel currently shows.
enum Surface {
    Page(String),
    SearchResults {
        query: String,
        widgets: Vec<RenderHandle>,
    },
}

struct ViewModel {
    settings: DemoSettings,
    tree: Tree,
    compiler: Compiler,
    schema: Rc<CompiledSchema>,
    surface: Surface,
    /// Page to return to when the search box is cleared.
    last_page: String,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    accordions: HashMap<HandleId, AccordionState>,
    capturing_key: Option<HandleId>,
    status: Option<String>,
}

struct SearchMatchCache {
    query: String,
    indexed: usize,
    rows: Rc<HashMap<HandleId, SearchRow>>,
}

struct SearchRow {
    title: String,
    description: Option<String>,
    highlight: Vec<usize>,
}

impl SettingsApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        options: CompileOptions,
        initial_page: String,
        initial_search: Option<String>,
    ) -> Self {
        let state = Self::build(options, &initial_page, initial_search.as_deref());
        Self {
            options,
            initial_page,
            initial_search,
            state,
        }
    }

    fn build(options: CompileOptions, page: &str, search: Option<&str>) -> AppState {
        match ViewModel::new(options, page, search) {
            Ok(model) => AppState::Ready(Box::new(model)),
            Err(error) => {
                tracing::error!(%error, "settings failed to compile");
                AppState::Error(error.to_string())
            }
        }
    }
}

impl eframe::App for SettingsApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to compile settings");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::build(
                            self.options,
                            &self.initial_page,
                            self.initial_search.as_deref(),
                        ));
                    }
                });
            }
            AppState::Ready(model) => {
                if let Err(error) = model.show(ctx) {
                    transition = Some(AppState::Error(error.to_string()));
                }
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(options: CompileOptions, page: &str, search: Option<&str>) -> Result<Self, CompileError> {
        let settings = DemoSettings::new();
        let tree = settings.tree();
        let mut compiler = Compiler::with_options(options);
        let schema = compiler.compile(&tree)?;

        let mut model = Self {
            settings,
            tree,
            compiler,
            schema: Rc::clone(&schema),
            surface: Surface::Page(String::new()),
            last_page: String::new(),
            search: String::new(),
            search_match_cache: None,
            accordions: HashMap::new(),
            capturing_key: None,
            status: None,
        };

        if adapter::show_page_or_first(&mut model, &schema, page).is_none() {
            model.status = Some("No settings have a visualizer".to_owned());
        }
        if let Some(query) = search {
            model.search = query.to_owned();
            model.run_search();
        }

        Ok(model)
    }

    /// Throws away every cached page and search entry and compiles again.
    fn recompile(&mut self) -> Result<(), CompileError> {
        self.compiler.clear();
        self.compiler.search_mut().clear();
        self.schema = self.compiler.compile(&self.tree)?;
        self.search_match_cache = None;
        self.accordions.clear();
        self.capturing_key = None;

        let schema = Rc::clone(&self.schema);
        let page = self.last_page.clone();
        adapter::show_page_or_first(&mut *self, &schema, &page);
        self.run_search();
        Ok(())
    }

    fn open_page(&mut self, name: &str) {
        let schema = Rc::clone(&self.schema);
        match adapter::get_page(&schema, name) {
            Ok(page) => {
                self.search.clear();
                self.show_page(page);
            }
            Err(error) => self.status = Some(error.to_string()),
        }
    }

    fn run_search(&mut self) {
        let query = self.search.trim().to_owned();
        if query.chars().count() < settings_forge::search::MIN_QUERY_LEN {
            if matches!(self.surface, Surface::SearchResults { .. }) {
                self.surface = Surface::Page(self.last_page.clone());
            }
            return;
        }

        let results = self.compiler.query(&query);
        self.on_search_result(results);
    }
}

impl PresentationAdapter for ViewModel {
    fn show_page(&mut self, page: &CompiledPage) {
        self.last_page = page.category().to_owned();
        self.surface = Surface::Page(page.category().to_owned());
    }

    fn on_search_result(&mut self, widgets: Vec<RenderHandle>) {
        self.surface = Surface::SearchResults {
            query: self.search.trim().to_owned(),
            widgets,
        };
    }
}
