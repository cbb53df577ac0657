use super::{ApiError, ApiResult, Backend};
use crate::model::{
    ApiResponse, Configuracion, Dificultad, Evento, EventoDificultad, EventoDificultadList,
    FotoConfig, Pregunta, TriviaConfig,
};
use reqwest::Method;
use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::{Value, json};

/// Backend real: HTTP + JSON contra `api_url`.
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

fn normalizar_base(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Saca el `message` de un cuerpo de error; si no es JSON devuelve el texto tal cual.
fn extraer_mensaje(texto: &str) -> String {
    if let Ok(valor) = serde_json::from_str::<Value>(texto) {
        for clave in ["message", "error", "mensaje"] {
            if let Some(m) = valor.get(clave).and_then(Value::as_str) {
                return m.to_string();
            }
        }
    }
    texto.trim().chars().take(200).collect()
}

fn leer_sobre<T: DeserializeOwned>(texto: &str) -> ApiResult<Option<T>> {
    if texto.trim().is_empty() {
        return Ok(None);
    }
    let sobre: ApiResponse<T> = serde_json::from_str(texto)?;
    if sobre.status >= 400 {
        return Err(ApiError::Rechazada {
            status: sobre.status,
            mensaje: sobre.message,
        });
    }
    Ok(sobre.response)
}

/// El conteo llega como número suelto o dentro de un objeto, según la versión del backend.
fn interpretar_conteo(valor: &Value) -> Option<u64> {
    match valor {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(obj) => ["count", "total", "cantidad", "cantidad_preguntas"]
            .iter()
            .find_map(|k| obj.get(*k))
            .and_then(interpretar_conteo),
        _ => None,
    }
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalizar_base(base_url),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn pedir<T: DeserializeOwned>(
        &self,
        metodo: Method,
        path: &str,
        cuerpo: Option<Value>,
    ) -> ApiResult<Option<T>> {
        log::debug!("{metodo} {path}");
        let mut req = self.client.request(metodo.clone(), self.url(path));
        if let Some(cuerpo) = cuerpo {
            req = req.json(&cuerpo);
        }

        let response = req.send().map_err(|err| {
            log::warn!("{metodo} {path}: sin conexión ({err})");
            ApiError::from(err)
        })?;

        let status = response.status();
        let texto = response.text()?;
        if !status.is_success() {
            let err = ApiError::Http {
                status: status.as_u16(),
                mensaje: extraer_mensaje(&texto),
            };
            log::warn!("{metodo} {path}: {err}");
            return Err(err);
        }

        leer_sobre(&texto).inspect_err(|err| log::warn!("{metodo} {path}: {err}"))
    }

    fn sin_respuesta(&self, metodo: Method, path: &str, cuerpo: Option<Value>) -> ApiResult<()> {
        self.pedir::<IgnoredAny>(metodo, path, cuerpo).map(|_| ())
    }

    fn cuerpo<B: Serialize + ?Sized>(valor: &B) -> ApiResult<Value> {
        Ok(serde_json::to_value(valor)?)
    }
}

impl Backend for HttpBackend {
    fn listar_eventos(&self) -> ApiResult<Vec<Evento>> {
        Ok(self.pedir(Method::GET, "/eventos", None)?.unwrap_or_default())
    }

    fn obtener_evento(&self, id: u64) -> ApiResult<Evento> {
        self.pedir(Method::GET, &format!("/eventos/{id}"), None)?
            .ok_or(ApiError::SinDatos("el evento"))
    }

    fn crear_evento(&self, evento: &Evento) -> ApiResult<()> {
        self.sin_respuesta(Method::POST, "/eventos", Some(Self::cuerpo(evento)?))
    }

    fn actualizar_evento(&self, evento: &Evento) -> ApiResult<()> {
        let path = format!("/eventos/{}", evento.id);
        self.sin_respuesta(Method::PUT, &path, Some(Self::cuerpo(evento)?))
    }

    fn eliminar_evento(&self, id: u64) -> ApiResult<()> {
        self.sin_respuesta(Method::DELETE, &format!("/eventos/{id}"), None)
    }

    fn marcar_visible(&self, id: u64, visible: bool) -> ApiResult<()> {
        let path = format!("/eventos/{id}/visible");
        self.sin_respuesta(Method::PUT, &path, Some(json!({ "isVisible": visible })))
    }

    fn marcar_predeterminado(&self, id: u64, predeterminado: bool) -> ApiResult<()> {
        let path = format!("/eventos/{id}/predeterminado");
        let cuerpo = json!({ "isPredeterminado": predeterminado });
        self.sin_respuesta(Method::PUT, &path, Some(cuerpo))
    }

    fn listar_dificultades(&self) -> ApiResult<Vec<Dificultad>> {
        Ok(self.pedir(Method::GET, "/dificultades", None)?.unwrap_or_default())
    }

    fn crear_dificultad(&self, dificultad: &Dificultad) -> ApiResult<()> {
        self.sin_respuesta(Method::POST, "/dificultades", Some(Self::cuerpo(dificultad)?))
    }

    fn actualizar_dificultad(&self, dificultad: &Dificultad) -> ApiResult<()> {
        let path = format!("/dificultades/{}", dificultad.id);
        self.sin_respuesta(Method::PUT, &path, Some(Self::cuerpo(dificultad)?))
    }

    fn eliminar_dificultad(&self, id: u64) -> ApiResult<()> {
        self.sin_respuesta(Method::DELETE, &format!("/dificultades/{id}"), None)
    }

    fn listar_evento_dificultades(&self, evento_id: u64) -> ApiResult<Vec<EventoDificultadList>> {
        let path = format!("/evento-dificultad/{evento_id}");
        Ok(self.pedir(Method::GET, &path, None)?.unwrap_or_default())
    }

    fn crear_evento_dificultad(&self, ed: &EventoDificultad) -> ApiResult<()> {
        self.sin_respuesta(Method::POST, "/evento-dificultad", Some(Self::cuerpo(ed)?))
    }

    fn actualizar_evento_dificultad(&self, ed: &EventoDificultad) -> ApiResult<()> {
        let id = ed.id.ok_or(ApiError::SinDatos("el id del nivel"))?;
        let path = format!("/evento-dificultad/{id}");
        self.sin_respuesta(Method::PUT, &path, Some(Self::cuerpo(ed)?))
    }

    fn eliminar_evento_dificultad(&self, id: u64) -> ApiResult<()> {
        self.sin_respuesta(Method::DELETE, &format!("/evento-dificultad/{id}"), None)
    }

    fn preguntas_de_evento_dificultad(&self, evento_dificultad_id: u64) -> ApiResult<Vec<Pregunta>> {
        let path = format!("/evento-dificultad/{evento_dificultad_id}/preguntas");
        Ok(self.pedir(Method::GET, &path, None)?.unwrap_or_default())
    }

    fn preguntas_de_evento_completo(&self, evento_id: u64) -> ApiResult<Vec<Pregunta>> {
        let path = format!("/eventos/{evento_id}/preguntas-completo");
        Ok(self.pedir(Method::GET, &path, None)?.unwrap_or_default())
    }

    fn contar_preguntas_evento(&self, evento_id: u64) -> ApiResult<u64> {
        let path = format!("/eventos/{evento_id}/preguntas/count");
        let valor: Option<Value> = self.pedir(Method::GET, &path, None)?;
        valor
            .as_ref()
            .and_then(interpretar_conteo)
            .ok_or(ApiError::SinDatos("el número de preguntas"))
    }

    fn crear_pregunta(&self, pregunta: &Pregunta) -> ApiResult<()> {
        self.sin_respuesta(Method::POST, "/preguntas", Some(Self::cuerpo(pregunta)?))
    }

    fn actualizar_pregunta(&self, pregunta: &Pregunta) -> ApiResult<()> {
        let path = format!("/preguntas/{}", pregunta.id);
        self.sin_respuesta(Method::PUT, &path, Some(Self::cuerpo(pregunta)?))
    }

    fn actualizar_pregunta_completa(&self, pregunta: &Pregunta) -> ApiResult<()> {
        let path = format!("/preguntas/{}/completo", pregunta.id);
        self.sin_respuesta(Method::PUT, &path, Some(Self::cuerpo(pregunta)?))
    }

    fn eliminar_pregunta(&self, id: u64) -> ApiResult<()> {
        self.sin_respuesta(Method::DELETE, &format!("/preguntas/{id}"), None)
    }

    fn crear_preguntas_masivo(&self, preguntas: &[Pregunta]) -> ApiResult<Vec<Pregunta>> {
        let valor: Option<Value> = self.pedir(
            Method::POST,
            "/preguntas/create/masivo",
            Some(Self::cuerpo(preguntas)?),
        )?;
        // La forma de `response` varía; lo que no sea una lista de preguntas se ignora.
        Ok(valor
            .and_then(|v| serde_json::from_value::<Vec<Pregunta>>(v).ok())
            .unwrap_or_default())
    }

    fn actualizar_preguntas_masivo(&self, preguntas: &[Pregunta]) -> ApiResult<()> {
        let cuerpo = Self::cuerpo(preguntas)?;
        self.sin_respuesta(Method::PUT, "/preguntas/update/masivo", Some(cuerpo))
    }

    fn obtener_configuracion(&self) -> ApiResult<Configuracion> {
        self.pedir(Method::GET, "/configuracion", None)?
            .ok_or(ApiError::SinDatos("la configuración"))
    }

    fn actualizar_config_foto(&self, foto: &FotoConfig) -> ApiResult<()> {
        self.sin_respuesta(Method::PUT, "/configuracion/foto", Some(Self::cuerpo(foto)?))
    }

    fn actualizar_config_trivia(&self, trivia: &TriviaConfig) -> ApiResult<()> {
        let cuerpo = Self::cuerpo(trivia)?;
        self.sin_respuesta(Method::PUT, "/configuracion/trivia", Some(cuerpo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    fn fin_de_cabeceras(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n")
    }

    fn leer_peticion(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(fin) = fin_de_cabeceras(&buf) {
                let cabecera = String::from_utf8_lossy(&buf[..fin]).to_string();
                let largo = cabecera
                    .lines()
                    .filter_map(|l| l.split_once(':'))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                while buf.len() < fin + 4 + largo {
                    let n = stream.read(&mut chunk).unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                break;
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Servidor que atiende una sola petición y devuelve lo que recibió.
    fn servidor_unico(status: &'static str, cuerpo: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let peticion = leer_peticion(&mut stream);
            let respuesta = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{cuerpo}",
                cuerpo.len()
            );
            stream.write_all(respuesta.as_bytes()).unwrap();
            peticion
        });
        (format!("http://{addr}/api/"), handle)
    }

    #[test]
    fn base_url_sin_barra_final() {
        let backend = HttpBackend::new(" http://localhost:3000/api/ ");
        assert_eq!(backend.url("/eventos"), "http://localhost:3000/api/eventos");
    }

    #[test]
    fn listar_eventos_lee_el_sobre() {
        let (url, srv) = servidor_unico(
            "200 OK",
            r#"{"status":200,"message":"ok","response":[{"id":1,"nombre":"Feria","isActive":1,"isVisible":true}]}"#,
        );
        let eventos = HttpBackend::new(&url).listar_eventos().unwrap();
        let peticion = srv.join().unwrap();

        assert!(peticion.starts_with("GET /api/eventos HTTP/1.1"));
        assert_eq!(eventos.len(), 1);
        assert_eq!(eventos[0].nombre, "Feria");
        assert!(eventos[0].is_visible);
    }

    #[test]
    fn marcar_visible_envia_put_con_flag() {
        let (url, srv) = servidor_unico("200 OK", r#"{"status":200,"message":"ok","response":null}"#);
        HttpBackend::new(&url).marcar_visible(7, true).unwrap();
        let peticion = srv.join().unwrap();

        assert!(peticion.starts_with("PUT /api/eventos/7/visible HTTP/1.1"));
        assert!(peticion.ends_with(r#"{"isVisible":true}"#));
    }

    #[test]
    fn error_http_conserva_mensaje_del_servidor() {
        let (url, srv) = servidor_unico(
            "409 Conflict",
            r#"{"status":409,"message":"La dificultad está asignada a un evento","response":null}"#,
        );
        let err = HttpBackend::new(&url).eliminar_dificultad(2).unwrap_err();
        let peticion = srv.join().unwrap();

        assert!(peticion.starts_with("DELETE /api/dificultades/2 HTTP/1.1"));
        match err {
            ApiError::Http { status, mensaje } => {
                assert_eq!(status, 409);
                assert_eq!(mensaje, "La dificultad está asignada a un evento");
            }
            otro => panic!("error inesperado: {otro:?}"),
        }
    }

    #[test]
    fn sobre_con_status_de_error_se_rechaza() {
        let (url, srv) =
            servidor_unico("200 OK", r#"{"status":400,"message":"Nombre duplicado","response":null}"#);
        let err = HttpBackend::new(&url)
            .crear_dificultad(&Dificultad {
                id: 0,
                nombre: "Fácil".into(),
                is_active: true,
            })
            .unwrap_err();
        srv.join().unwrap();
        assert_eq!(err.mensaje_usuario("x"), "Nombre duplicado");
    }

    #[test]
    fn masivo_tolera_respuesta_sin_lista() {
        let (url, srv) =
            servidor_unico("201 Created", r#"{"status":201,"message":"creadas","response":{"insertadas":2}}"#);
        let preguntas = vec![Pregunta::nueva(Some(3)), Pregunta::nueva(Some(3))];
        let creadas = HttpBackend::new(&url).crear_preguntas_masivo(&preguntas).unwrap();
        let peticion = srv.join().unwrap();

        assert!(peticion.starts_with("POST /api/preguntas/create/masivo HTTP/1.1"));
        assert!(creadas.is_empty());
    }

    #[test]
    fn crear_pregunta_envia_post_con_cuerpo() {
        let (url, srv) = servidor_unico("201 Created", r#"{"status":201,"message":"creada","response":null}"#);
        let mut pregunta = Pregunta::nueva(Some(3));
        pregunta.pregunta = "¿Capital del Perú?".into();
        HttpBackend::new(&url).crear_pregunta(&pregunta).unwrap();
        let peticion = srv.join().unwrap();

        assert!(peticion.starts_with("POST /api/preguntas HTTP/1.1"));
        assert!(peticion.contains(r#""evento_dificultad_id":3"#));
        assert!(peticion.contains("¿Capital del Perú?"));
    }

    #[test]
    fn actualizar_pregunta_usa_su_id() {
        let (url, srv) = servidor_unico("200 OK", r#"{"status":200,"message":"ok","response":null}"#);
        let pregunta = Pregunta {
            id: 41,
            ..Pregunta::nueva(Some(3))
        };
        HttpBackend::new(&url).actualizar_pregunta(&pregunta).unwrap();
        let peticion = srv.join().unwrap();

        assert!(peticion.starts_with("PUT /api/preguntas/41 HTTP/1.1"));
        assert!(peticion.contains(r#""id":41"#));
    }

    #[test]
    fn conteo_acepta_numero_u_objeto() {
        assert_eq!(interpretar_conteo(&json!(5)), Some(5));
        assert_eq!(interpretar_conteo(&json!({"count": 3})), Some(3));
        assert_eq!(interpretar_conteo(&json!({"total": "8"})), Some(8));
        assert_eq!(interpretar_conteo(&json!([1, 2])), None);

        let (url, srv) = servidor_unico("200 OK", r#"{"status":200,"message":"ok","response":{"count":12}}"#);
        assert_eq!(HttpBackend::new(&url).contar_preguntas_evento(4).unwrap(), 12);
        assert!(srv.join().unwrap().starts_with("GET /api/eventos/4/preguntas/count HTTP/1.1"));
    }

    #[test]
    fn extraer_mensaje_de_texto_plano() {
        assert_eq!(extraer_mensaje("Bad gateway\n"), "Bad gateway");
        assert_eq!(extraer_mensaje(r#"{"error":"sin permiso"}"#), "sin permiso");
    }
}
