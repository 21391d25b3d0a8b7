//! Image upload and retrieval.
//!
//! ```text
//! POST /api/v1/upload            (authenticated, multipart field `file`)
//! POST /api/v1/upload/multiple   (authenticated, up to 10 `files` fields)
//! GET  /uploads/{name}
//! ```

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{HttpResponse, get, post, web};
use futures_util::TryStreamExt as _;
use tracing::{debug, info};

use crate::domain::ports::ImageStoreError;
use crate::domain::{Error, ImageFormat, ImageName, MAX_UPLOAD_BYTES};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{MultiUploadBody, MultiUploadForm, UploadBody, UploadForm};
use crate::inbound::http::session::Authenticated;
use crate::inbound::http::state::HttpState;

/// Most files accepted by one `/upload/multiple` request.
pub const MAX_FILES_PER_REQUEST: usize = 10;

const SINGLE_FIELD: &str = "file";
const MULTIPLE_FIELD: &str = "files";

fn map_image_store_error(error: ImageStoreError) -> Error {
    Error::internal(error.to_string())
}

fn map_multipart_error(error: MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {error}"))
}

/// One file part read from the form, before validation.
struct ReceivedFile {
    filename: String,
    content_type: Option<String>,
    bytes: Option<Vec<u8>>,
}

/// A file part that passed the type and size checks.
struct AcceptedImage {
    filename: String,
    format: ImageFormat,
    bytes: Vec<u8>,
}

#[derive(Debug, PartialEq, Eq)]
enum Rejection {
    Empty,
    Oversized,
    UnsupportedType,
}

impl Rejection {
    fn into_error(self) -> Error {
        match self {
            Self::Empty => Error::invalid_request("uploaded file is empty"),
            Self::Oversized => Error::invalid_request(format!(
                "file too large; at most {MAX_UPLOAD_BYTES} bytes"
            )),
            Self::UnsupportedType => {
                Error::invalid_request("invalid file type; allowed: jpg, png, gif, webp")
            }
        }
    }
}

/// Image format from the file extension, falling back to the part's
/// `Content-Type` when the name has none.
fn detect_format(filename: &str, content_type: Option<&str>) -> Option<ImageFormat> {
    match filename.rsplit_once('.') {
        Some((_, extension)) => ImageFormat::from_extension(extension),
        None => content_type.and_then(ImageFormat::from_content_type),
    }
}

impl ReceivedFile {
    fn validate(self) -> Result<AcceptedImage, Rejection> {
        let format = detect_format(&self.filename, self.content_type.as_deref())
            .ok_or(Rejection::UnsupportedType)?;
        let bytes = self.bytes.ok_or(Rejection::Oversized)?;
        if bytes.is_empty() {
            return Err(Rejection::Empty);
        }
        Ok(AcceptedImage {
            filename: self.filename,
            format,
            bytes,
        })
    }
}

/// Read a part to its end. Bytes past [`MAX_UPLOAD_BYTES`] are drained and
/// the content reported as `None`.
async fn read_file(mut field: Field) -> Result<ReceivedFile, MultipartError> {
    let filename = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .unwrap_or_default()
        .to_owned();
    let content_type = field.content_type().map(|mime| mime.essence_str().to_owned());

    let mut bytes = Some(Vec::new());
    while let Some(chunk) = field.try_next().await? {
        if let Some(buffer) = bytes.as_mut() {
            if buffer.len() + chunk.len() > MAX_UPLOAD_BYTES {
                bytes = None;
            } else {
                buffer.extend_from_slice(&chunk);
            }
        }
    }
    Ok(ReceivedFile {
        filename,
        content_type,
        bytes,
    })
}

/// Parts named `name`, in order, keeping at most `keep` of them. Every other
/// part is drained. Also returns how many `name` parts were sent.
async fn collect_files(
    mut form: Multipart,
    name: &str,
    keep: usize,
) -> ApiResult<(Vec<ReceivedFile>, usize)> {
    let mut files = Vec::new();
    let mut seen = 0;
    while let Some(mut field) = form.try_next().await.map_err(map_multipart_error)? {
        let wanted = field.name() == Some(name);
        seen += usize::from(wanted);
        if wanted && files.len() < keep {
            files.push(read_file(field).await.map_err(map_multipart_error)?);
            continue;
        }
        while field.try_next().await.map_err(map_multipart_error)?.is_some() {}
    }
    Ok((files, seen))
}

/// Store one image sent as the multipart field `file`.
#[utoipa::path(
    post,
    path = "/api/v1/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored", body = UploadBody),
        (status = 400, description = "Missing, empty, oversized or unsupported file", body = Error),
        (status = 401, description = "Missing, invalid or expired token", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "uploadImage",
    security(("bearer" = []))
)]
#[post("/upload")]
pub async fn upload_image(
    user: Authenticated,
    state: web::Data<HttpState>,
    form: Multipart,
) -> ApiResult<HttpResponse> {
    let (mut files, _) = collect_files(form, SINGLE_FIELD, 1).await?;
    let file = files
        .pop()
        .ok_or_else(|| Error::invalid_request("no file provided"))?;
    let image = file.validate().map_err(Rejection::into_error)?;

    let size = image.bytes.len();
    let name = state
        .images
        .store(image.format, image.bytes)
        .await
        .map_err(map_image_store_error)?;
    info!(image = %name, size, account_id = %user.0.account_id, "image uploaded");
    Ok(HttpResponse::Ok().json(UploadBody {
        url: name.locator(),
        filename: image.filename,
        size,
    }))
}

/// Store up to ten images sent as repeated `files` fields.
///
/// Files with an unsupported type or size are skipped; the request fails
/// only when nothing could be stored.
#[utoipa::path(
    post,
    path = "/api/v1/upload/multiple",
    request_body(content = MultiUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Locators of the stored files", body = MultiUploadBody),
        (status = 400, description = "No files, too many files or none valid", body = Error),
        (status = 401, description = "Missing, invalid or expired token", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "uploadImages",
    security(("bearer" = []))
)]
#[post("/upload/multiple")]
pub async fn upload_images(
    user: Authenticated,
    state: web::Data<HttpState>,
    form: Multipart,
) -> ApiResult<HttpResponse> {
    let (files, seen) = collect_files(form, MULTIPLE_FIELD, MAX_FILES_PER_REQUEST).await?;
    if files.is_empty() {
        return Err(Error::invalid_request("no files provided"));
    }
    if seen > MAX_FILES_PER_REQUEST {
        return Err(Error::invalid_request(format!(
            "at most {MAX_FILES_PER_REQUEST} files may be uploaded at once"
        )));
    }

    let mut urls = Vec::with_capacity(files.len());
    for file in files {
        let filename = file.filename.clone();
        let image = match file.validate() {
            Ok(image) => image,
            Err(rejection) => {
                debug!(filename = %filename, ?rejection, "skipping invalid upload");
                continue;
            }
        };
        match state.images.store(image.format, image.bytes).await {
            Ok(name) => urls.push(name.locator()),
            Err(err) => debug!(filename = %filename, error = %err, "skipping upload that failed to store"),
        }
    }
    if urls.is_empty() {
        return Err(Error::invalid_request("no valid files uploaded"));
    }

    info!(count = urls.len(), account_id = %user.0.account_id, "images uploaded");
    Ok(HttpResponse::Ok().json(MultiUploadBody {
        count: urls.len(),
        urls,
    }))
}

/// Serve a stored image.
#[utoipa::path(
    get,
    path = "/uploads/{name}",
    params(("name" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "Image bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "No such image", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "getUpload",
    security([])
)]
#[get("/uploads/{name}")]
pub async fn get_upload(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let not_found = || Error::not_found("image not found");
    let name = ImageName::parse(&path).ok_or_else(not_found)?;
    let bytes = state
        .images
        .fetch(&name)
        .await
        .map_err(map_image_store_error)?
        .ok_or_else(not_found)?;
    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, name.format().content_type()))
        .insert_header((CACHE_CONTROL, "public, max-age=86400"))
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test::{self}};
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::Role;
    use crate::inbound::http::configure_api;
    use crate::test_support::{TestHarness, multipart_body};

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

    macro_rules! init_app {
        ($harness:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($harness.state.clone()))
                    .configure(configure_api),
            )
            .await
        };
    }

    fn upload_request(
        uri: &str,
        token: Option<String>,
        parts: &[(&str, &str, &[u8])],
    ) -> test::TestRequest {
        let (content_type, body) = multipart_body(parts);
        let mut req = test::TestRequest::post()
            .uri(uri)
            .insert_header((CONTENT_TYPE, content_type))
            .set_payload(body);
        if let Some(token) = token {
            req = req.insert_header((AUTHORIZATION, token));
        }
        req
    }

    #[rstest]
    #[case("photo.png", None, Some(ImageFormat::Png))]
    #[case("PHOTO.JPEG", None, Some(ImageFormat::Jpeg))]
    #[case("archive.tar.webp", None, Some(ImageFormat::Webp))]
    #[case("notes.txt", Some("image/png"), None)]
    #[case("no-extension", Some("image/gif"), Some(ImageFormat::Gif))]
    #[case("no-extension", None, None)]
    fn format_comes_from_the_extension(
        #[case] filename: &str,
        #[case] content_type: Option<&str>,
        #[case] expected: Option<ImageFormat>,
    ) {
        assert_eq!(detect_format(filename, content_type), expected);
    }

    #[rstest]
    fn oversized_parts_are_rejected_before_type_checks() {
        let file = ReceivedFile {
            filename: "big.png".to_owned(),
            content_type: None,
            bytes: None,
        };
        assert_eq!(file.validate().err(), Some(Rejection::Oversized));
    }

    #[actix_web::test]
    async fn upload_then_fetch_round_trip() {
        let harness = TestHarness::new();
        let app = init_app!(harness);

        let req = upload_request(
            "/api/v1/upload",
            Some(harness.bearer_for(Role::User)),
            &[("file", "ruby-reflex.png", PNG_BYTES)],
        );
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["size"], PNG_BYTES.len());
        assert_eq!(body["filename"], "ruby-reflex.png");
        let url = body["url"].as_str().expect("url").to_owned();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let res = test::call_service(&app, test::TestRequest::get().uri(&url).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("image/png")
        );
        assert_eq!(test::read_body(res).await.as_ref(), PNG_BYTES);
    }

    #[actix_web::test]
    async fn upload_requires_authentication() {
        let harness = TestHarness::new();
        let app = init_app!(harness);
        for uri in ["/api/v1/upload", "/api/v1/upload/multiple"] {
            let req = upload_request(uri, None, &[("file", "a.png", PNG_BYTES)]);
            assert_eq!(
                test::call_service(&app, req.to_request()).await.status(),
                StatusCode::UNAUTHORIZED,
                "{uri}"
            );
        }
    }

    #[rstest]
    #[case::wrong_field("image", "a.png", PNG_BYTES.to_vec())]
    #[case::unsupported_extension("file", "notes.txt", b"hello".to_vec())]
    #[case::empty("file", "a.png", Vec::new())]
    #[case::oversized("file", "big.jpg", vec![0_u8; MAX_UPLOAD_BYTES + 1])]
    #[actix_web::test]
    async fn invalid_single_uploads_are_rejected(
        #[case] field: &str,
        #[case] filename: &str,
        #[case] bytes: Vec<u8>,
    ) {
        let harness = TestHarness::new();
        let app = init_app!(harness);
        let req = upload_request(
            "/api/v1/upload",
            Some(harness.bearer_for(Role::User)),
            &[(field, filename, bytes.as_slice())],
        );
        assert_eq!(
            test::call_service(&app, req.to_request()).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn only_the_first_file_part_is_stored() {
        let harness = TestHarness::new();
        let app = init_app!(harness);
        let req = upload_request(
            "/api/v1/upload",
            Some(harness.bearer_for(Role::User)),
            &[("file", "first.gif", b"GIF89a".as_slice()), ("file", "second.png", PNG_BYTES)],
        );
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["filename"], "first.gif");
        assert_eq!(body["size"], 6);
    }

    #[actix_web::test]
    async fn raw_bodies_are_not_accepted() {
        let harness = TestHarness::new();
        let app = init_app!(harness);
        let req = test::TestRequest::post()
            .uri("/api/v1/upload")
            .insert_header((AUTHORIZATION, harness.bearer_for(Role::User)))
            .insert_header((CONTENT_TYPE, "image/png"))
            .set_payload(PNG_BYTES)
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_client_error());
    }

    #[actix_web::test]
    async fn multiple_upload_skips_invalid_files() {
        let harness = TestHarness::new();
        let app = init_app!(harness);
        let oversized = vec![0_u8; MAX_UPLOAD_BYTES + 1];
        let req = upload_request(
            "/api/v1/upload/multiple",
            Some(harness.bearer_for(Role::User)),
            &[
                ("files", "front.png", PNG_BYTES),
                ("files", "notes.txt", b"hello".as_slice()),
                ("files", "huge.jpg", oversized.as_slice()),
                ("other", "ignored.png", PNG_BYTES),
                ("files", "back.gif", b"GIF89a".as_slice()),
            ],
        );
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["count"], 2);
        let urls = body["urls"].as_array().expect("urls");
        assert!(urls[0].as_str().is_some_and(|url| url.ends_with(".png")));
        assert!(urls[1].as_str().is_some_and(|url| url.ends_with(".gif")));
    }

    #[rstest]
    #[case::none(0, "notes.txt")]
    #[case::none_valid(3, "notes.txt")]
    #[case::too_many(MAX_FILES_PER_REQUEST + 1, "a.png")]
    #[actix_web::test]
    async fn multiple_upload_rejects_unusable_requests(#[case] count: usize, #[case] filename: &str) {
        let harness = TestHarness::new();
        let app = init_app!(harness);
        let parts = vec![("files", filename, PNG_BYTES); count];
        let req = upload_request(
            "/api/v1/upload/multiple",
            Some(harness.bearer_for(Role::User)),
            &parts,
        );
        assert_eq!(
            test::call_service(&app, req.to_request()).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn traversal_names_are_not_found() {
        let harness = TestHarness::new();
        let app = init_app!(harness);
        for uri in ["/uploads/..%2Fsecret.png", "/uploads/missing.png", "/uploads/notes.txt"] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }
}
