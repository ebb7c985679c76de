//! Server-side HTML of the dashboard.
//!
//! Pages are plain strings assembled with `format!`; every value that comes
//! from Spotify or the store goes through [`escape_html`] first.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    stats::genres::{Direction, GenreDelta, GenreShare},
    types::{Suggestion, Term, TrackRecord},
    utils::escape_html,
};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #191414; }
h1 { text-align: center; }
.center { text-align: center; }
.muted { color: gray; font-size: 0.85rem; }
.button { background-color: #1DB954; border: none; padding: 0.6rem 1.2rem; border-radius: 30px; color: white; font-size: 1rem; cursor: pointer; text-decoration: none; display: inline-block; }
.button.secondary { background-color: #535353; }
.toolbar { display: flex; gap: 1rem; align-items: center; justify-content: space-between; margin: 1rem 0; }
.info { background: #e8f4fd; border-radius: 6px; padding: 0.8rem 1rem; }
.success { background: #e6f7ec; border-radius: 6px; padding: 0.8rem 1rem; }
.error { background: #fdecea; border-radius: 6px; padding: 0.8rem 1rem; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 0.35rem 0.5rem; border-bottom: 1px solid #eee; }
.bar-row { display: grid; grid-template-columns: 12rem 1fr 4rem; gap: 0.5rem; align-items: center; margin: 0.25rem 0; }
.bar { background: rgb(30,215,96); height: 1.1rem; border-radius: 3px; }
.up { color: #1DB954; }
.down { color: #d93025; }
.suggestion { display: flex; gap: 1rem; align-items: center; border-bottom: 1px solid #eee; padding: 0.5rem 0; }
.suggestion img { width: 96px; height: 96px; object-fit: cover; }
"#;

/// Everything the dashboard shows for one user and term.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub display_name: String,
    pub term: Term,
    /// Set right after a refresh.
    pub loaded: bool,
    pub tracks: Vec<TrackRecord>,
    pub genres: Vec<GenreShare>,
    /// Empty for the all-time term itself, or while no all-time tracks are stored.
    pub deltas: Vec<GenreDelta>,
    pub suggestions: Vec<Suggestion>,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

pub fn login_page() -> String {
    layout(
        "spotvibe",
        "<h1>🌷 spotvibe</h1>\n\
         <p class=\"center\">Log in to explore your top Spotify tracks and genres!</p>\n\
         <div class=\"center\"><a class=\"button\" href=\"/login\">🔐 Log in with Spotify</a></div>\n\
         <p class=\"center muted\">Your data stays on this machine.</p>",
    )
}

pub fn callback_page() -> String {
    layout(
        "spotvibe - logged in",
        "<h2>Authentication successful.</h2>\n\
         <p>You can close this window or <a href=\"/\">continue to your dashboard</a>.</p>",
    )
}

pub fn error_page(message: &str, login_link: bool) -> String {
    let link = if login_link {
        "<p><a class=\"button\" href=\"/login\">🔐 Log in again</a></p>"
    } else {
        "<p><a href=\"/\">Back to the dashboard</a></p>"
    };

    layout(
        "spotvibe - error",
        &format!(
            "<h2>Something went wrong</h2>\n<p class=\"error\">{}</p>\n{}",
            escape_html(message),
            link
        ),
    )
}

pub fn error_response(status: StatusCode, message: &str, login_link: bool) -> Response {
    (status, Html(error_page(message, login_link))).into_response()
}

pub fn dashboard_page(view: &DashboardView) -> String {
    let mut body = String::new();

    body.push_str(&toolbar(view.term));
    if view.loaded {
        body.push_str(&format!(
            "<p class=\"success\">✅ Data loaded for {}!</p>\n",
            escape_html(&view.display_name)
        ));
    }
    body.push_str(&format!(
        "<h2>👋 Welcome, {}!</h2>\n",
        escape_html(&view.display_name)
    ));

    if view.tracks.is_empty() {
        body.push_str(
            "<p class=\"info\">Click '🔄 Load My Spotify Data' to view your personalized stats.</p>\n",
        );
        return layout("spotvibe", &body);
    }

    body.push_str(&tracks_section(view.term, &view.tracks));
    body.push_str(&genre_section(view.term, &view.genres));
    if view.term != Term::LongTerm {
        body.push_str(&delta_section(&view.deltas));
    }
    body.push_str(&suggestions_section(&view.suggestions));

    layout("spotvibe", &body)
}

fn toolbar(term: Term) -> String {
    let options: String = Term::ALL
        .iter()
        .map(|t| {
            format!(
                "<option value=\"{}\"{}>{}</option>",
                t.as_str(),
                if *t == term { " selected" } else { "" },
                t.label()
            )
        })
        .collect();

    format!(
        "<div class=\"toolbar\">\n\
         <form method=\"post\" action=\"/refresh\">\
         <input type=\"hidden\" name=\"term\" value=\"{term}\">\
         <button class=\"button\" type=\"submit\">🔄 Load My Spotify Data</button></form>\n\
         <form method=\"get\" action=\"/\"><label>Top Tracks for: \
         <select name=\"term\" onchange=\"this.form.submit()\">{options}</select></label>\
         <noscript><button type=\"submit\">Show</button></noscript></form>\n\
         <form method=\"post\" action=\"/logout\">\
         <button class=\"button secondary\" type=\"submit\">🚪 Log out</button></form>\n\
         </div>\n",
        term = term.as_str(),
        options = options
    )
}

fn tracks_section(term: Term, tracks: &[TrackRecord]) -> String {
    let rows: String = tracks
        .iter()
        .map(|t| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"muted\">{}</td></tr>\n",
                t.play_count,
                escape_html(&t.track_name),
                escape_html(&t.artist_name),
                escape_html(&t.genre)
            )
        })
        .collect();

    format!(
        "<h3>🎶 Top Tracks - {}</h3>\n<table>\n\
         <tr><th>#</th><th>Track</th><th>Artist</th><th>Genre</th></tr>\n{}</table>\n",
        term.label(),
        rows
    )
}

fn genre_section(term: Term, genres: &[GenreShare]) -> String {
    let mut html = format!("<h3>📊 Genre Distribution - {}</h3>\n", term.label());

    if genres.is_empty() {
        html.push_str("<p class=\"info\">No genre data available for this term.</p>\n");
        return html;
    }

    for share in genres {
        html.push_str(&format!(
            "<div class=\"bar-row\"><span>{}</span>\
             <div class=\"bar\" style=\"width: {:.1}%\"></div><span>{:.1}%</span></div>\n",
            escape_html(&share.genre),
            share.percentage,
            share.percentage
        ));
    }
    html
}

fn delta_section(deltas: &[GenreDelta]) -> String {
    let mut html = String::from("<h3>📈 Compared to All Time</h3>\n");

    if deltas.is_empty() {
        html.push_str(
            "<p class=\"info\">No all time data stored yet. Load your Spotify data to compare.</p>\n",
        );
        return html;
    }

    html.push_str(
        "<table>\n<tr><th></th><th>Genre</th><th>Now</th><th>All Time</th><th>Delta</th></tr>\n",
    );
    for d in deltas {
        let class = match d.direction {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Unchanged => "muted",
        };
        html.push_str(&format!(
            "<tr><td class=\"{}\">{}</td><td>{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{:+.1}</td></tr>\n",
            class,
            d.direction.symbol(),
            escape_html(&d.genre),
            d.current,
            d.all_time,
            d.delta
        ));
    }
    html.push_str("</table>\n");
    html
}

fn suggestions_section(suggestions: &[Suggestion]) -> String {
    let mut html = String::from("<h3>💡 Suggested Songs Based on Your Top Tracks</h3>\n");

    if suggestions.is_empty() {
        html.push_str(
            "<p class=\"info\">No song suggestions available. Try refreshing your data.</p>\n",
        );
        return html;
    }

    for s in suggestions {
        let image = match &s.image {
            Some(url) => format!("<img src=\"{}\" alt=\"\">", escape_html(url)),
            None => "<span>🎵</span>".to_string(),
        };
        let preview = match &s.preview {
            Some(url) => format!(
                "<br><audio controls preload=\"none\" src=\"{}\"></audio>",
                escape_html(url)
            ),
            None => String::new(),
        };

        html.push_str(&format!(
            "<div class=\"suggestion\">{}<div><strong>{}</strong><br><em>by {}</em><br>\
             <span class=\"muted\">{}</span><br>\
             <a href=\"{}\" target=\"_blank\" rel=\"noopener\">Listen on Spotify</a>{}</div></div>\n",
            image,
            escape_html(&s.track),
            escape_html(&s.artist),
            escape_html(&s.summary),
            escape_html(&s.url),
            preview
        ));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(tracks: Vec<TrackRecord>) -> DashboardView {
        DashboardView {
            display_name: "Ada <3".to_string(),
            term: Term::MediumTerm,
            loaded: false,
            tracks,
            genres: Vec::new(),
            deltas: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    fn record(name: &str) -> TrackRecord {
        TrackRecord {
            username: "ada".to_string(),
            track_id: "t1".to_string(),
            term: Term::MediumTerm,
            track_name: name.to_string(),
            artist_name: "Artist".to_string(),
            genre: "Unknown".to_string(),
            play_count: 1,
        }
    }

    #[test]
    fn dashboard_without_tracks_asks_for_refresh() {
        let html = dashboard_page(&view(Vec::new()));
        assert!(html.contains("Load My Spotify Data' to view your personalized stats"));
        assert!(html.contains("Ada &lt;3"));
        assert!(!html.contains("Top Tracks - "));
    }

    #[test]
    fn dashboard_shows_empty_states() {
        let html = dashboard_page(&view(vec![record("Song & Dance")]));
        assert!(html.contains("Song &amp; Dance"));
        assert!(html.contains("No genre data available for this term."));
        assert!(html.contains("No song suggestions available. Try refreshing your data."));
        assert!(html.contains("<option value=\"medium_term\" selected>"));
    }

    #[test]
    fn dashboard_without_all_time_data_shows_no_comparison() {
        let mut view = view(vec![record("Song")]);
        view.genres = vec![GenreShare {
            genre: "rock".to_string(),
            count: 1,
            percentage: 100.0,
        }];

        let html = dashboard_page(&view);
        assert!(html.contains("Compared to All Time"));
        assert!(html.contains("No all time data stored yet."));
        assert!(!html.contains("<td class=\"up\">"));
        assert!(!html.contains("<th>Delta</th>"));
    }

    #[test]
    fn error_page_links_to_login() {
        assert!(error_page("expired", true).contains("href=\"/login\""));
        assert!(!error_page("boom", false).contains("href=\"/login\""));
    }
}
