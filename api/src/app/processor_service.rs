//! Image processor service
//!
//! Runs uploads through the normalisation pipeline and packs the results
//! into a single archive. All work here is CPU-bound and synchronous; HTTP
//! handlers call it from the blocking thread pool.

use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, RgbImage};

use crate::app::archive::{archive_file_name, entry_name, ArchiveBuilder};
use crate::app::imaging;
use crate::domain::entities::{
    BatchId, FailedUpload, Operations, OutputFormat, ProcessedBatch, ProcessorConfig,
    UploadedImage,
};
use crate::domain::ports::{BackgroundRemover, Clock};
use crate::error::DomainError;

/// Service that normalises product images
pub struct ImageProcessor<BR, C>
where
    BR: BackgroundRemover,
    C: Clock,
{
    config: ProcessorConfig,
    remover: Arc<BR>,
    clock: Arc<C>,
}

impl<BR, C> ImageProcessor<BR, C>
where
    BR: BackgroundRemover,
    C: Clock,
{
    pub fn new(config: ProcessorConfig, remover: Arc<BR>, clock: Arc<C>) -> Self {
        Self {
            config,
            remover,
            clock,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Run one decoded image through the enabled stages
    pub fn process_image(
        &self,
        image: &DynamicImage,
        operations: &Operations,
    ) -> Result<RgbImage, DomainError> {
        let fill = self.config.backgrounds.default_color;

        // Alpha is dropped here, not composited
        let mut rgb = image.to_rgb8();
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(DomainError::Validation("image has no pixels".to_string()));
        }

        if operations.resize {
            rgb = imaging::resize_contain(&rgb, self.config.dimensions, fill);
        }

        if operations.remove_background {
            let cutout = self.remover.remove_background(&rgb)?;
            rgb = imaging::flatten(&cutout, fill);
        }

        if operations.enhance {
            rgb = imaging::enhance(&rgb);
        }

        if operations.watermark {
            tracing::debug!("Watermark requested; no watermark stage is configured");
        }

        Ok(rgb)
    }

    /// Encode an image in the given format
    pub fn save_image(&self, image: &RgbImage, format: OutputFormat) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::new();
        match format {
            OutputFormat::Jpeg => {
                image.write_with_encoder(JpegEncoder::new_with_quality(
                    &mut buf,
                    self.config.quality,
                ))?;
            }
            OutputFormat::Png => image.write_with_encoder(PngEncoder::new(&mut buf))?,
            OutputFormat::Webp => image.write_with_encoder(WebPEncoder::new_lossless(&mut buf))?,
        }
        Ok(buf)
    }

    /// Decode, process and re-encode one upload in the configured format
    pub fn process_upload(
        &self,
        data: &[u8],
        operations: &Operations,
    ) -> Result<Vec<u8>, DomainError> {
        let image = image::load_from_memory(data)?;
        let processed = self.process_image(&image, operations)?;
        self.save_image(&processed, self.config.output_format)
    }

    /// Process every named upload and pack the successes into one archive.
    ///
    /// A failing upload is logged and reported; it never aborts the batch.
    pub fn process_batch(
        &self,
        batch_id: BatchId,
        uploads: Vec<UploadedImage>,
        operations: &Operations,
    ) -> Result<ProcessedBatch, DomainError> {
        let _span = tracing::info_span!("batch", %batch_id).entered();

        let mut archive = ArchiveBuilder::new();
        let mut failures = Vec::new();

        for upload in &uploads {
            let Some(file_name) = upload.base_name() else {
                continue;
            };

            match self.process_upload(&upload.data, operations) {
                Ok(encoded) => {
                    let name = entry_name(self.clock.now(), file_name);
                    archive.add(&name, &encoded)?;
                }
                Err(e) => {
                    tracing::error!("Error processing {}: {}", file_name, e);
                    failures.push(FailedUpload {
                        file_name: file_name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let processed = archive.len();
        if archive.is_empty() {
            tracing::warn!("Batch produced no images ({} failed)", failures.len());
        } else {
            tracing::info!(
                "Processed {} image(s), {} failed",
                processed,
                failures.len()
            );
        }

        Ok(ProcessedBatch {
            archive: archive.finish()?,
            archive_name: archive_file_name(self.clock.now()),
            processed,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Dimensions, HexColor};
    use crate::test_utils::{
        encode_png, fixed_clock, product_on_backdrop, FailingBackgroundRemover,
        RecordingBackgroundRemover,
    };
    use image::{Rgb, Rgba, RgbaImage};
    use std::io::Cursor;

    fn processor_with(
        config: ProcessorConfig,
    ) -> ImageProcessor<RecordingBackgroundRemover, crate::test_utils::FixedClock> {
        ImageProcessor::new(
            config,
            Arc::new(RecordingBackgroundRemover::new()),
            Arc::new(fixed_clock()),
        )
    }

    fn small_config() -> ProcessorConfig {
        ProcessorConfig {
            dimensions: Dimensions {
                width: 32,
                height: 32,
            },
            output_format: OutputFormat::Png,
            ..ProcessorConfig::default()
        }
    }

    fn only(resize: bool, remove_background: bool, enhance: bool) -> Operations {
        Operations {
            resize,
            remove_background,
            enhance,
            watermark: false,
        }
    }

    fn archive_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn resize_produces_configured_canvas() {
        let processor = processor_with(small_config());
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 16, Rgb([0, 0, 0])));

        let out = processor
            .process_image(&image, &only(true, false, false))
            .unwrap();

        assert_eq!(out.dimensions(), (32, 32));
        // 64x16 fits as 32x8 at y offset 12
        assert_eq!(out.get_pixel(16, 2).0, [255, 255, 255]);
        assert_eq!(out.get_pixel(16, 15).0, [0, 0, 0]);
    }

    #[test]
    fn no_stages_only_converts_to_rgb() {
        let processor = processor_with(small_config());
        let rgba = RgbaImage::from_pixel(5, 3, Rgba([10, 20, 30, 0]));

        let out = processor
            .process_image(&DynamicImage::ImageRgba8(rgba), &only(false, false, false))
            .unwrap();

        assert_eq!(out.dimensions(), (5, 3));
        // transparent pixels keep their colour, the alpha is dropped
        assert_eq!(out.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn background_removal_flattens_onto_default_color() {
        let mut config = small_config();
        config.backgrounds.default_color = HexColor([0, 255, 0]);
        let remover = Arc::new(RecordingBackgroundRemover::new());
        let processor = ImageProcessor::new(config, remover.clone(), Arc::new(fixed_clock()));

        let out = processor
            .process_image(
                &DynamicImage::ImageRgb8(product_on_backdrop(9, 9)),
                &only(false, true, false),
            )
            .unwrap();

        assert_eq!(remover.calls(), 1);
        // the recording remover clears every pixel
        assert_eq!(out.get_pixel(4, 4).0, [0, 255, 0]);
    }

    #[test]
    fn remover_errors_propagate() {
        let processor = ImageProcessor::new(
            small_config(),
            Arc::new(FailingBackgroundRemover),
            Arc::new(fixed_clock()),
        );
        let image = DynamicImage::ImageRgb8(product_on_backdrop(9, 9));

        let result = processor.process_image(&image, &only(false, true, false));
        assert!(matches!(result, Err(DomainError::Io(_))));
    }

    #[test]
    fn save_image_respects_format() {
        let processor = processor_with(ProcessorConfig::default());
        let image = RgbImage::from_pixel(4, 4, Rgb([90, 90, 90]));

        let jpeg = processor.save_image(&image, OutputFormat::Jpeg).unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);

        let png = processor.save_image(&image, OutputFormat::Png).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");

        let webp = processor.save_image(&image, OutputFormat::Webp).unwrap();
        assert_eq!(&webp[..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn png_output_is_lossless() {
        let processor = processor_with(small_config());
        let data = encode_png(&product_on_backdrop(12, 12));

        let encoded = processor
            .process_upload(&data, &only(false, false, false))
            .unwrap();
        let decoded = image::load_from_memory(&encoded).unwrap().to_rgb8();
        assert_eq!(decoded, product_on_backdrop(12, 12));
    }

    #[test]
    fn batch_names_entries_and_skips_unnamed_uploads() {
        let processor = processor_with(small_config());
        let png = encode_png(&product_on_backdrop(8, 8));
        let uploads = vec![
            UploadedImage::new("shoe.png", png.clone()),
            UploadedImage::new("", png.clone()),
            UploadedImage {
                file_name: None,
                data: png.clone(),
            },
            UploadedImage::new("spring/hat.png", png),
        ];

        let batch = processor
            .process_batch(BatchId::new(), uploads, &Operations::default())
            .unwrap();

        assert_eq!(batch.processed, 2);
        assert!(batch.failures.is_empty());
        assert_eq!(batch.archive_name, "processed_images_20240102_030405.zip");
        assert_eq!(
            archive_names(&batch.archive),
            vec![
                "processed_20240102_030405_shoe.png",
                "processed_20240102_030405_hat.png",
            ]
        );
    }

    #[test]
    fn batch_continues_past_undecodable_upload() {
        let processor = processor_with(small_config());
        let uploads = vec![
            UploadedImage::new("notes.txt", b"not an image".to_vec()),
            UploadedImage::new("shoe.png", encode_png(&product_on_backdrop(8, 8))),
        ];

        let batch = processor
            .process_batch(BatchId::new(), uploads, &Operations::default())
            .unwrap();

        assert_eq!(batch.processed, 1);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].file_name, "notes.txt");
        assert_eq!(
            archive_names(&batch.archive),
            vec!["processed_20240102_030405_shoe.png"]
        );
    }

    #[test]
    fn batch_deduplicates_same_second_names() {
        let processor = processor_with(small_config());
        let png = encode_png(&product_on_backdrop(8, 8));
        let uploads = vec![
            UploadedImage::new("shoe.png", png.clone()),
            UploadedImage::new("shoe.png", png),
        ];

        let batch = processor
            .process_batch(BatchId::new(), uploads, &Operations::default())
            .unwrap();

        assert_eq!(
            archive_names(&batch.archive),
            vec![
                "processed_20240102_030405_shoe.png",
                "processed_20240102_030405_shoe_1.png",
            ]
        );
    }

    #[test]
    fn empty_batch_still_yields_archive() {
        let processor = processor_with(small_config());
        let batch = processor
            .process_batch(BatchId::new(), Vec::new(), &Operations::default())
            .unwrap();

        assert_eq!(batch.processed, 0);
        assert!(archive_names(&batch.archive).is_empty());
    }
}
