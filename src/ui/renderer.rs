//! Plain-text rendering of the view model.
//!
//! The renderer is a pure function of the [`UIViewModel`]: it makes no
//! decisions about copy or visibility, it only lays lines out.
//!
//! # Layout
//!
//! ```text
//! [greeting + tagline]        (unfiltered discover only)
//! [view tabs | filters]
//! ─────────────────────────
//! [section title]
//! [movie rows | empty state]
//! [pagination control]
//! [detail panel]              (when a movie is open)
//! ```

use crate::app::View;
use crate::ui::viewmodel::{DetailInfo, DisplayItem, FooterControl, HeaderInfo, UIViewModel};
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

/// Renders `vm` to `out`.
///
/// # Errors
///
/// Propagates write errors from `out`.
///
/// # Example
///
/// ```rust
/// use cinematch::app::{AppSettings, AppState};
/// use cinematch::storage::{FavoritesStore, MemoryStore};
/// use cinematch::ui::render;
///
/// let state = AppState::new(
///     FavoritesStore::load(Box::new(MemoryStore::default())),
///     &AppSettings::default(),
/// );
/// let vm = state.compute_viewmodel(chrono::Local::now().naive_local());
/// let mut out = Vec::new();
/// render(&vm, &mut out)?;
/// assert!(String::from_utf8(out)?.contains("Tendencias de hoy"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render(vm: &UIViewModel, out: &mut impl Write) -> io::Result<()> {
    render_header(&vm.header, out)?;
    writeln!(out, "{}", "─".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", vm.section_title)?;
    writeln!(out)?;

    if let Some(empty) = &vm.empty_state {
        writeln!(out, "  {}", empty.message)?;
        writeln!(out, "  {}", empty.subtitle)?;
    } else if vm.header.loading {
        writeln!(out, "  Cargando...")?;
    } else {
        for item in &vm.display_items {
            render_item(item, out)?;
        }
    }

    render_footer(vm.footer, out)?;

    if let Some(detail) = &vm.detail {
        render_detail(detail, out)?;
    }
    out.flush()
}

fn render_header(header: &HeaderInfo, out: &mut impl Write) -> io::Result<()> {
    if let Some(greeting) = &header.greeting {
        writeln!(out, "{greeting}")?;
    }
    if let Some(tagline) = &header.tagline {
        writeln!(out, "{tagline}")?;
    }

    let tab = |view: View, label: &str| {
        if header.view == view {
            format!("[{label}]")
        } else {
            format!(" {label} ")
        }
    };
    let mut filters = Vec::new();
    if !header.search_text.is_empty() {
        filters.push(format!("búsqueda: \"{}\"", header.search_text));
    }
    if let Some(year) = &header.year {
        filters.push(format!("año: {year}"));
    }
    if let Some(profile) = header.mood.and_then(|mood| mood.profile()) {
        filters.push(format!("mood: {}", profile.label));
    }

    write!(
        out,
        "{}{}",
        tab(View::Discover, "Descubrir"),
        tab(View::Favorites, &format!("Favoritos ({})", header.favorites_count)),
    )?;
    if filters.is_empty() {
        writeln!(out)
    } else {
        writeln!(out, "  {}", filters.join(" · "))
    }
}

fn render_item(item: &DisplayItem, out: &mut impl Write) -> io::Result<()> {
    let heart = if item.is_favorite { "♥" } else { " " };
    let year = if item.year.is_empty() { "----" } else { &item.year };
    writeln!(out, "  {heart} {:>8}  {year}  ★ {:>4}  {}", item.id, item.rating, item.title)
}

fn render_footer(footer: FooterControl, out: &mut impl Write) -> io::Result<()> {
    match footer {
        FooterControl::None => Ok(()),
        FooterControl::Sentinel { loading: true } => writeln!(out, "\n  ··· cargando"),
        FooterControl::Sentinel { loading: false } => writeln!(out, "\n  ··· (scroll)"),
        control @ FooterControl::LoadMore { .. } => {
            writeln!(out, "\n  [ {} ] (more)", control.label().unwrap_or_default())
        }
    }
}

fn render_detail(detail: &DetailInfo, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n{}", "═".repeat(RULE_WIDTH))?;
    let heart = if detail.item.is_favorite { " ♥" } else { "" };
    writeln!(out, "{} ({}) ★ {}{heart}", detail.item.title, detail.item.year, detail.item.rating)?;
    if let Some(backdrop) = &detail.backdrop_url {
        writeln!(out, "{backdrop}")?;
    }
    writeln!(out, "\n{}", detail.synopsis)?;

    if detail.loading {
        return writeln!(out, "\nCargando detalles...");
    }

    match &detail.trailer_url {
        Some(url) => writeln!(out, "\nTráiler: {url}")?,
        None => writeln!(out, "\nTráiler no disponible")?,
    }

    if detail.providers.is_unavailable() {
        writeln!(out, "No disponible en streaming")?;
    } else {
        if !detail.providers.flatrate.is_empty() {
            writeln!(out, "Streaming: {}", detail.providers.flatrate.join(", "))?;
        }
        if !detail.providers.rent.is_empty() {
            writeln!(out, "Alquiler: {}", detail.providers.rent.join(", "))?;
        }
        if !detail.providers.link.is_empty() {
            writeln!(out, "{}", detail.providers.link)?;
        }
    }

    if !detail.cast.is_empty() {
        writeln!(out, "\nReparto:")?;
        for member in &detail.cast {
            writeln!(out, "  {} como {}", member.name, member.character)?;
        }
    }

    if !detail.similar.is_empty() {
        writeln!(out, "\nSimilares:")?;
        for (position, item) in detail.similar.iter().enumerate() {
            writeln!(out, "  {}. {} ({})", position + 1, item.title, item.year)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::{EmptyState, ProvidersInfo};

    fn item(id: i64, title: &str, favorite: bool) -> DisplayItem {
        DisplayItem {
            id,
            title: title.to_string(),
            year: "1999".to_string(),
            rating: "8.7".to_string(),
            poster_url: String::new(),
            is_favorite: favorite,
        }
    }

    fn viewmodel() -> UIViewModel {
        UIViewModel {
            header: HeaderInfo {
                view: View::Discover,
                greeting: Some("Buenas tardes 🌤️".to_string()),
                tagline: None,
                search_text: String::new(),
                year: None,
                mood: None,
                favorites_count: 1,
                loading: false,
            },
            section_title: "Tendencias de hoy 🔥".to_string(),
            display_items: vec![item(603, "The Matrix", true), item(604, "Reloaded", false)],
            empty_state: None,
            footer: FooterControl::LoadMore { loading: false },
            detail: None,
            year_options: vec![],
        }
    }

    fn rendered(vm: &UIViewModel) -> String {
        let mut out = Vec::new();
        render(vm, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_rows_and_manual_control() {
        let text = rendered(&viewmodel());
        assert!(text.contains("Buenas tardes"));
        assert!(text.contains("[Descubrir]"));
        let row = text.lines().find(|line| line.contains("The Matrix")).unwrap();
        assert!(row.trim_start().starts_with('♥'));
        assert!(row.contains("603  1999  ★  8.7  The Matrix"));
        assert!(text.contains("Cargar más películas"));
    }

    #[test]
    fn empty_state_replaces_rows() {
        let mut vm = viewmodel();
        vm.empty_state = Some(EmptyState {
            message: "Aún no has guardado películas.".to_string(),
            subtitle: String::new(),
        });
        let text = rendered(&vm);
        assert!(text.contains("Aún no has guardado películas."));
        assert!(!text.contains("The Matrix"));
    }

    #[test]
    fn detail_shows_unavailable_providers() {
        let mut vm = viewmodel();
        vm.detail = Some(DetailInfo {
            item: item(603, "The Matrix", true),
            synopsis: "No hay sinopsis disponible.".to_string(),
            backdrop_url: None,
            loading: false,
            trailer_url: None,
            providers: ProvidersInfo::default(),
            cast: vec![],
            similar: vec![item(604, "Reloaded", false)],
        });
        let text = rendered(&vm);
        assert!(text.contains("Tráiler no disponible"));
        assert!(text.contains("No disponible en streaming"));
        assert!(text.contains("1. Reloaded (1999)"));
    }
}
