// private sub-module defined in other files
mod copy_features;
mod feature_to_point;
mod make_feature_layer;
mod select_layer_by_attribute;
mod table_to_csv;

// exports identifiers from private sub-modules in the current module namespace
pub use self::copy_features::CopyFeatures;
pub use self::feature_to_point::{feature_to_point, FeatureToPoint, PointLocation};
pub use self::make_feature_layer::MakeFeatureLayer;
pub use self::select_layer_by_attribute::{
    select_by_attribute, where_clause_to_expression, SelectLayerByAttribute,
};
pub use self::table_to_csv::{table_to_csv, TableToCsv};
