fn main() -> anyhow::Result<()> {
    excel_image_extractor_lib::run()
}
