use crate::{AssetError, TextureAsset, TextureSource, fetch_texture};
use std::sync::mpsc::{self, Receiver, TryRecvError};

type LoadResult = Result<TextureAsset, AssetError>;

/// A texture fetch running on a background thread.
///
/// Poll once per frame; the result is handed out exactly once. There is no
/// timeout, retry or cancellation: dropping the handle just discards the
/// result when it arrives.
#[derive(Debug)]
pub struct TextureLoad {
    source: TextureSource,
    receiver: Option<Receiver<LoadResult>>,
}

impl TextureLoad {
    /// Start fetching `source` on a dedicated thread.
    pub fn spawn(source: TextureSource) -> Result<Self, AssetError> {
        let (tx, rx) = mpsc::channel();
        let worker_source = source.clone();
        std::thread::Builder::new()
            .name("texture-fetch".into())
            .spawn(move || {
                // Receiver may already be gone; nothing to report then.
                let _ = tx.send(fetch_texture(&worker_source));
            })?;
        tracing::info!(%source, "texture fetch started");
        Ok(Self {
            source,
            receiver: Some(rx),
        })
    }

    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    /// True once the result has been handed out.
    pub fn is_settled(&self) -> bool {
        self.receiver.is_none()
    }

    /// Non-blocking check. Returns `Some` exactly once.
    pub fn poll(&mut self) -> Option<LoadResult> {
        let receiver = self.receiver.as_ref()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(AssetError::Abandoned),
        };
        self.receiver = None;
        Some(result)
    }

    /// Block until the result arrives.
    pub fn wait(mut self) -> LoadResult {
        match self.receiver.take() {
            Some(receiver) => receiver.recv().unwrap_or(Err(AssetError::Abandoned)),
            None => Err(AssetError::Abandoned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn poll_until_settled(load: &mut TextureLoad) -> LoadResult {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = load.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "texture load never settled");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn resolves_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("earth.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let mut load = TextureLoad::spawn(TextureSource::Path(path)).unwrap();
        let texture = poll_until_settled(&mut load).unwrap();
        assert_eq!(texture.width(), 2);
        assert!(load.is_settled());
        assert!(load.poll().is_none());
    }

    #[test]
    fn failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = TextureSource::Path(dir.path().join("absent.png"));
        let mut load = TextureLoad::spawn(source).unwrap();
        assert!(matches!(
            poll_until_settled(&mut load),
            Err(AssetError::Io(_))
        ));
    }

    #[test]
    fn wait_blocks_for_result() {
        let dir = tempfile::tempdir().unwrap();
        let source = TextureSource::Path(dir.path().join("absent.png"));
        let load = TextureLoad::spawn(source.clone()).unwrap();
        assert_eq!(load.source(), &source);
        assert!(load.wait().is_err());
    }
}
