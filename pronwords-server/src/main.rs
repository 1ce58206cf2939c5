use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};

use pronwords_core::model::alphabet::DEFAULT_ALPHABET;
use pronwords_core::model::generator::Generator;
use pronwords_core::model::pronounceable::PronounceabilityModel;
use pronwords_core::report::{matches, Match, Summary};
use pronwords_core::selector::{resolve_threshold, ThresholdMode};

/// Largest candidate space a single `/v1/words` request may enumerate.
const MAX_CANDIDATES: u128 = 1_000_000;

/// Serve pronounceability scores over HTTP
#[derive(Parser, Debug)]
#[command(name = "pronwords-server", version, about)]
struct Args {
	/// Path to the corpus containing text to learn from
	#[arg(short = 'i', long)]
	corpus: PathBuf,

	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	#[arg(long, default_value_t = 5000)]
	port: u16,
}

/// Query parameters of `/v1/score` and `/v1/pronounceable`
#[derive(Deserialize)]
struct WordQuery {
	word: String,
	threshold: Option<f64>,
}

/// Query parameters of `/v1/words`
#[derive(Deserialize)]
struct WordsQuery {
	length: usize,
	characters: Option<String>,
	threshold: Option<f64>,
	percentile: Option<f64>,
	top: Option<usize>,
}

/// Query parameters of `PUT /v1/weights`, missing ones keep their value
#[derive(Deserialize)]
struct WeightsQuery {
	unigram: Option<f64>,
	bigram: Option<f64>,
	trigram: Option<f64>,
}

#[derive(Serialize)]
struct WordsResponse {
	threshold: Option<f64>,
	matches: Vec<Match>,
	summary: Summary,
}

struct SharedData {
	model: PronounceabilityModel,
}

/// HTTP GET endpoint `/v1/score`
///
/// Returns `<word> <score>`.
#[get("/v1/score")]
async fn get_score(data: web::Data<Mutex<SharedData>>, query: web::Query<WordQuery>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let score = shared_data.model.word_score(&query.word);
	HttpResponse::Ok().body(Match { word: query.word.to_lowercase(), score }.to_string())
}

/// HTTP GET endpoint `/v1/pronounceable`
///
/// Returns `true` when the word scores at least `threshold`.
#[get("/v1/pronounceable")]
async fn get_pronounceable(data: web::Data<Mutex<SharedData>>, query: web::Query<WordQuery>) -> impl Responder {
	let threshold = match query.threshold {
		Some(t) if t.is_finite() => t,
		_ => return HttpResponse::BadRequest().body("Missing or invalid threshold"),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	HttpResponse::Ok().body(shared_data.model.is_pronounceable(&query.word, threshold).to_string())
}

/// HTTP GET endpoint `/v1/words`
///
/// Enumerates every word of `length` symbols over `characters` and returns
/// the ones reaching the threshold, as JSON.
///
/// # Notes
/// - At most one of `threshold`, `percentile` and `top` may be given.
/// - Requests over more than `MAX_CANDIDATES` candidates are refused.
#[get("/v1/words")]
async fn get_words(data: web::Data<Mutex<SharedData>>, query: web::Query<WordsQuery>) -> impl Responder {
	let mode = match ThresholdMode::from_options(query.threshold, query.percentile, query.top) {
		Ok(mode) => mode,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};

	let characters = query.characters.as_deref().unwrap_or(DEFAULT_ALPHABET);
	let mut generator = match Generator::new(characters, query.length) {
		Ok(g) => g,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};

	match generator.total() {
		Some(total) if total <= MAX_CANDIDATES => (),
		_ => return HttpResponse::BadRequest().body(format!("Too many candidates, limit is {MAX_CANDIDATES}")),
	}

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let threshold = match mode {
		Some(mode) => match resolve_threshold(mode, &mut generator, &shared_data.model) {
			Ok(t) => t,
			Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
		},
		None => None,
	};

	let mut summary = Summary::new(generator.total());
	let found: Vec<Match> = matches(&mut generator, &shared_data.model, threshold)
		.inspect(|m| summary.record(m.score))
		.collect();

	HttpResponse::Ok().json(WordsResponse { threshold, matches: found, summary })
}

#[get("/v1/weights")]
async fn get_weights(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.model.weights())
}

#[put("/v1/weights")]
async fn put_weights(data: web::Data<Mutex<SharedData>>, query: web::Query<WeightsQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let current = shared_data.model.weights();
	let result = shared_data.model.set_weights(
		query.unigram.unwrap_or(current.unigram),
		query.bigram.unwrap_or(current.bigram),
		query.trigram.unwrap_or(current.trigram),
	);

	match result {
		Ok(()) => HttpResponse::Ok().json(shared_data.model.weights()),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// Main entry point for the server.
///
/// Learns the corpus, wraps the model in a `Mutex` and starts an Actix-web
/// HTTP server.
#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let model = PronounceabilityModel::from_corpus_file(&args.corpus).map_err(io::Error::other)?;
	info!("corpus {} learnt, {} distinct characters", args.corpus.display(), model.unigram().len());

	let shared_model = web::Data::new(Mutex::new(SharedData { model }));

	info!("listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_score)
			.service(get_pronounceable)
			.service(get_words)
			.service(get_weights)
			.service(put_weights)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test;

	fn shared(corpus: &str) -> web::Data<Mutex<SharedData>> {
		let mut model = PronounceabilityModel::new();
		model.add_word(corpus);
		web::Data::new(Mutex::new(SharedData { model }))
	}

	#[actix_web::test]
	async fn score() {
		let app = test::init_service(App::new().app_data(shared("woo")).service(get_score)).await;
		let req = test::TestRequest::get().uri("/v1/score?word=WO").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, web::Bytes::from_static(b"wo 1.5"));
	}

	#[actix_web::test]
	async fn pronounceable() {
		let app = test::init_service(App::new().app_data(shared("wooh")).service(get_pronounceable)).await;

		let req = test::TestRequest::get().uri("/v1/pronounceable?word=woo&threshold=2.25").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, web::Bytes::from_static(b"true"));

		let req = test::TestRequest::get().uri("/v1/pronounceable?word=woo&threshold=2.3").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, web::Bytes::from_static(b"false"));

		let req = test::TestRequest::get().uri("/v1/pronounceable?word=woo").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn words_with_top() {
		let app = test::init_service(App::new().app_data(shared("woo")).service(get_words)).await;
		let req = test::TestRequest::get().uri("/v1/words?length=2&characters=wo&top=1").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);

		let body = test::read_body(resp).await;
		let body = std::str::from_utf8(&body).unwrap();
		assert!(body.contains(r#""word":"oo""#), "{body}");
		assert!(!body.contains(r#""word":"ww""#), "{body}");
		assert!(body.contains(r#""matched":1"#), "{body}");
		assert!(body.starts_with(r#"{"threshold":"#), "{body}");
	}

	#[actix_web::test]
	async fn words_rejects_misuse() {
		let app = test::init_service(App::new().app_data(shared("woo")).service(get_words)).await;

		for uri in [
			"/v1/words?length=2&top=1&percentile=50",
			"/v1/words?length=2&percentile=100",
			"/v1/words?length=2&characters=",
			"/v1/words?length=10",
		] {
			let req = test::TestRequest::get().uri(uri).to_request();
			assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST, "{uri}");
		}
	}

	#[actix_web::test]
	async fn weights_update() {
		let app = test::init_service(
			App::new().app_data(shared("woo")).service(put_weights).service(get_weights),
		)
		.await;

		let req = test::TestRequest::put().uri("/v1/weights?bigram=0").to_request();
		let body = test::call_and_read_body(&app, req).await;
		let body = std::str::from_utf8(&body).unwrap();
		assert!(body.contains(r#""bigram":0.0"#), "{body}");
		assert!(body.contains(r#""trigram":5.0"#), "{body}");

		let req = test::TestRequest::put().uri("/v1/weights?unigram=-1").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
	}
}
