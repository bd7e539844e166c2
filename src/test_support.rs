//! 单元测试共用的一次性 HTTP 服务器。

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

/// 读取完整请求（请求头 + `Content-Length` 指定的请求体）。
fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = stream.read(&mut buf).expect("read request");
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&data).to_string()
}

/// 接受一个连接，返回固定响应；线程结束时交回收到的原始请求。
pub(crate) fn serve_once(response_head: String, body: Vec<u8>) -> (u16, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
    let port = listener.local_addr().expect("read local addr failed").port();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept failed");
        let request = read_request(&mut stream);

        stream
            .write_all(response_head.as_bytes())
            .expect("write headers failed");
        stream.write_all(&body).expect("write body failed");
        stream.flush().expect("flush failed");
        request
    });

    (port, server)
}

/// 以 JSON 响应体调用 `serve_once`。
pub(crate) fn serve_json_once(status_line: &str, body: String) -> (u16, thread::JoinHandle<String>) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status_line,
        body.len()
    );
    serve_once(head, body.into_bytes())
}
