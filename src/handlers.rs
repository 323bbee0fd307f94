use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{web, Either, HttpResponse, Result};

use crate::{
    docs,
    error::ApiError,
    models::{LstmForm, ManualPrediction, NeuralNetworkForm, RowPrediction, StatusResponse},
    page,
    predict::SentimentPredictor,
    store::Store,
    upload,
};

/// Everything a request needs, built once at startup.
pub struct AppState {
    pub store: Store,
    pub neural_network: Arc<dyn SentimentPredictor>,
    pub lstm: Arc<dyn SentimentPredictor>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/delete_all").route(web::get().to(delete_all)))
        .service(web::resource("/get_all").route(web::get().to(get_all)))
        .service(
            web::resource("/post_neural_network").route(web::post().to(post_neural_network)),
        )
        .service(
            web::resource("/upload_neural_network").route(web::post().to(upload_neural_network)),
        )
        .service(web::resource("/post_lstm").route(web::post().to(post_lstm)))
        .service(web::resource("/upload_lstm").route(web::post().to(upload_lstm)))
        .service(web::resource("/docs.json").route(web::get().to(api_docs)));
}

pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = web::block(move || state.store.connect()?.select_all()).await??;
    let html = page::render_index(&records)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

pub async fn delete_all(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let deleted = web::block(move || state.store.connect()?.delete_all()).await??;
    tracing::info!("Deleted {} logged predictions", deleted);
    Ok(HttpResponse::Ok().json(StatusResponse {
        status_code: 200,
        description: "Delete process is success".to_string(),
        data: "Delete all".to_string(),
    }))
}

pub async fn get_all(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = web::block(move || state.store.connect()?.select_all()).await??;
    Ok(HttpResponse::Ok().json(records))
}

const NEURAL_NETWORK_FIELD: &str = "manual_input_neural_network";
const LSTM_FIELD: &str = "post_lstm";

/// Form bodies arrive either urlencoded or as `multipart/form-data`.
type FormBody<T> = Either<web::Form<T>, Multipart>;

pub async fn post_neural_network(
    state: web::Data<AppState>,
    form: FormBody<NeuralNetworkForm>,
) -> Result<HttpResponse, ApiError> {
    let input = match form {
        Either::Left(form) => form.into_inner().manual_input_neural_network,
        Either::Right(payload) => upload::read_form_field(payload, NEURAL_NETWORK_FIELD).await?,
    }
    .ok_or(ApiError::MissingField(NEURAL_NETWORK_FIELD))?;
    let predictor = state.neural_network.clone();
    classify_single(state, predictor, input).await
}

pub async fn post_lstm(
    state: web::Data<AppState>,
    form: FormBody<LstmForm>,
) -> Result<HttpResponse, ApiError> {
    let input = match form {
        Either::Left(form) => form.into_inner().post_lstm,
        Either::Right(payload) => upload::read_form_field(payload, LSTM_FIELD).await?,
    }
    .ok_or(ApiError::MissingField(LSTM_FIELD))?;
    let predictor = state.lstm.clone();
    classify_single(state, predictor, input).await
}

pub async fn upload_neural_network(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let predictor = state.neural_network.clone();
    classify_upload(state, predictor, payload).await
}

pub async fn upload_lstm(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let predictor = state.lstm.clone();
    classify_upload(state, predictor, payload).await
}

pub async fn api_docs() -> HttpResponse {
    HttpResponse::Ok().json(docs::api_document())
}

/// Predict one text and append it to the input/output log.
async fn classify_single(
    state: web::Data<AppState>,
    predictor: Arc<dyn SentimentPredictor>,
    input: String,
) -> Result<HttpResponse, ApiError> {
    let response = web::block(move || -> Result<ManualPrediction, ApiError> {
        let output = predictor.predict(&input)?;
        state.store.connect()?.insert_input_log(&input, &output)?;
        tracing::info!(model = %predictor.kind(), %output, "Classified form input");
        Ok(ManualPrediction { input, output })
    })
    .await??;
    Ok(HttpResponse::Ok().json(response))
}

/// Predict every `text` row of an uploaded CSV, committing each row as it goes.
///
/// A failing row aborts the request; rows logged before it stay in the table.
async fn classify_upload(
    state: web::Data<AppState>,
    predictor: Arc<dyn SentimentPredictor>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let spooled = upload::spool_file_field(payload).await?;

    let results = web::block(move || -> Result<Vec<RowPrediction>, ApiError> {
        let bytes = spooled.read()?;
        let texts = upload::read_text_column(&upload::decode_upload(&bytes))?;
        let conn = state.store.connect()?;
        let kind = predictor.kind();

        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            let sentiment = predictor.predict(&text)?;
            conn.insert(&text, &sentiment, kind)?;
            results.push(RowPrediction { text, sentiment });
        }
        tracing::info!(model = %kind, rows = results.len(), "Classified uploaded CSV");
        Ok(results)
    })
    .await??;

    Ok(HttpResponse::Ok().json(results))
}
