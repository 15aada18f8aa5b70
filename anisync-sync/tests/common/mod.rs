#![allow(dead_code)]

use std::future::Future;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anisync_anilist::*;
use anisync_sync::PageSource;

/// Serves the same page script for every partition. `None` entries fail.
pub struct ScriptedSource {
    pages: Vec<Option<Page>>,
    pub calls: Mutex<Vec<(SeasonQuery, PageRequest)>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Option<Page>>) -> Self {
        Self {
            pages,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.calls.lock().unwrap().iter().map(|(_, r)| r.page).collect()
    }
}

impl PageSource for ScriptedSource {
    fn fetch_page(
        &self,
        query: &SeasonQuery,
        request: PageRequest,
    ) -> impl Future<Output = Result<Page, FetchError>> {
        self.calls.lock().unwrap().push((*query, request));
        let result = match self.pages.get(request.page as usize - 1) {
            Some(Some(page)) => Ok(page.clone()),
            Some(None) => Err(FetchError::ServerError {
                status: 500,
                message: "scripted failure".to_string(),
            }),
            None => Err(FetchError::MissingData),
        };
        std::future::ready(result)
    }
}

pub fn page(current: u32, last: u32, media: Vec<MediaItem>) -> Page {
    Page {
        page_info: PageInfo {
            total: media.len() as u32,
            current_page: current,
            last_page: last,
            has_next_page: current < last,
            per_page: 50,
        },
        media,
    }
}

pub fn record(id: i64, english: &str, synonyms: &[&str], genres: &[&str]) -> MediaItem {
    MediaItem {
        id,
        title: MediaTitle {
            romaji: Some(format!("{} (romaji)", english)),
            english: Some(english.to_string()),
            native: None,
            user_preferred: Some(format!("{} (preferred)", english)),
        },
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        start_date: FuzzyDate {
            year: Some(2024),
            month: Some(4),
            day: Some(6),
        },
        genres: genres.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn spring(year: i32) -> SeasonQuery {
    SeasonQuery {
        season: Season::Spring,
        season_year: year,
        is_adult: false,
    }
}

/// Serve one canned HTTP response on a local port and return the endpoint.
pub fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        reader.get_mut().write_all(response.as_bytes()).unwrap();
    });

    format!("http://{}", addr)
}

/// A real client with no request spacing.
pub fn local_client(endpoint: String) -> AniListClient {
    AniListClient::new(&ClientSettings {
        endpoint,
        timeout: Duration::from_secs(5),
        min_request_interval: Duration::ZERO,
    })
    .unwrap()
}
