//! Built-in remote-sensing operator catalog.

use super::{Category, FieldType, ParamField, Palette, Template, TemplateBehavior};

/// Template key of the cloud data input operator.
pub const CLOUD_INPUT_KEY: &str = "cloud_input";

const CRS_OPTIONS: [&str; 2] = ["EPSG:4326", "EPSG:4490"];

pub(super) fn catalog() -> Palette {
    Palette {
        categories: vec![
            Category::new("数据输入", vec![data_collection(), cloud_input()]),
            Category::new(
                "数据处理",
                vec![
                    radiometric_calibration(),
                    band_composite(),
                    mosaic(),
                    crop(),
                ],
            ),
            Category::new("智能解译", vec![ai_interpretation()]),
            Category::new("成果发布", vec![service_publish()]),
        ],
    }
}

fn data_collection() -> Template {
    Template::new("data_collection", "数据采集", "download")
        .with_description("从卫星地面站或数据中心采集原始影像")
        .with_field(
            ParamField::new("数据源", FieldType::Select)
                .required()
                .with_options(["高分一号", "高分二号", "资源三号", "Sentinel-2", "Landsat-8"]),
        )
        .with_field(ParamField::new("开始时间", FieldType::Date).required())
        .with_field(ParamField::new("结束时间", FieldType::Date).required())
        .with_field(
            ParamField::new("最大云量", FieldType::Range)
                .with_range(0.0, 100.0, 5.0)
                .with_default("20"),
        )
        .with_field(ParamField::new("存储路径", FieldType::File))
        .with_outputs(["原始遥感影像"])
}

fn cloud_input() -> Template {
    Template::new(CLOUD_INPUT_KEY, "云盘数据输入", "cloud")
        .with_behavior(TemplateBehavior::CloudInput)
        .with_description("从云盘目录选择影像并按卫星配置规则匹配")
        .with_outputs(["匹配影像列表"])
}

fn radiometric_calibration() -> Template {
    Template::new("radiometric_calibration", "辐射定标", "sun")
        .with_field(
            ParamField::new("定标类型", FieldType::Select)
                .required()
                .with_options(["表观反射率", "辐亮度"]),
        )
        .with_field(ParamField::new("定标参数文件", FieldType::File))
        .with_outputs(["定标影像"])
}

fn band_composite() -> Template {
    Template::new("band_composite", "波段合成", "layers")
        .with_description("将多个单波段影像合成为多波段影像")
        .with_field(ParamField::new("输入影像", FieldType::File).required())
        .with_field(
            ParamField::new("波段组合", FieldType::Select)
                .required()
                .with_options(["RGB(4,3,2)", "假彩色(5,4,3)", "自定义"]),
        )
        .with_field(
            ParamField::new("坐标系", FieldType::Select).with_options(CRS_OPTIONS),
        )
        .with_field(ParamField::new("输出路径", FieldType::File))
        .with_outputs(["合成影像"])
}

fn mosaic() -> Template {
    Template::new("mosaic", "影像镶嵌", "grid")
        .with_field(ParamField::new("输入影像", FieldType::File).required())
        .with_field(
            ParamField::new("匀色方法", FieldType::Select)
                .with_options(["直方图匹配", "Wallis", "不匀色"]),
        )
        .with_field(
            ParamField::new("羽化宽度", FieldType::Range)
                .with_range(0.0, 200.0, 10.0)
                .with_description("接边处羽化像素数"),
        )
        .with_field(
            ParamField::new("坐标系", FieldType::Select).with_options(CRS_OPTIONS),
        )
        .with_outputs(["镶嵌影像"])
}

fn crop() -> Template {
    Template::new("crop", "影像裁剪", "crop")
        .with_field(ParamField::new("输入影像", FieldType::File).required())
        .with_field(
            ParamField::new("裁剪范围", FieldType::File)
                .required()
                .with_description("矢量边界文件 (shp/geojson)"),
        )
        .with_field(
            ParamField::new("坐标系", FieldType::Select).with_options(CRS_OPTIONS),
        )
        .with_outputs(["裁剪影像"])
}

fn ai_interpretation() -> Template {
    Template::new("ai_interpretation", "AI解译", "brain")
        .with_description("基于深度学习模型的地物要素提取")
        .with_field(ParamField::new("输入影像", FieldType::File).required())
        .with_field(
            ParamField::new("解译模型", FieldType::Select)
                .required()
                .with_options(["建筑物提取", "水体提取", "耕地提取", "道路提取"]),
        )
        .with_field(
            ParamField::new("置信度阈值", FieldType::Range)
                .with_range(0.0, 1.0, 0.05)
                .with_default("0.5"),
        )
        .with_outputs(["解译结果", "矢量成果"])
}

fn service_publish() -> Template {
    Template::new("service_publish", "服务发布", "globe")
        .with_field(ParamField::new("服务名称", FieldType::Text).required())
        .with_field(
            ParamField::new("服务类型", FieldType::Select)
                .required()
                .with_options(["WMS", "WMTS", "WFS"]),
        )
        .with_field(ParamField::new("发布数据", FieldType::Text))
        .with_outputs(["服务地址"])
}
